//! Indented tree rendering of decomposed segments.
//!
//! One line per field repeat (`SEG-N[k] Description: value`, the `[k]`
//! suffix only for repeating fields), one sub-line per component with
//! box-drawing branch prefixes. Labels are padded to the segment's computed
//! maximum width so values line up in a single column.

use hl7_toolchain_schema::SchemaTables;

use crate::delim::Delimiters;
use crate::document;
use crate::segment::Segment;

/// Render one decomposed segment as an aligned tree.
pub fn render_segment(segment: &Segment) -> String {
    let width = segment.max_width;
    let mut out = String::new();

    for (i, field) in segment.fields.iter().enumerate() {
        let field_number = i + 1;
        let repeating = field.items.len() > 1;
        for (k, item) in field.items.iter().enumerate() {
            let repeat_suffix = if repeating {
                format!("[{}]", k + 1)
            } else {
                String::new()
            };
            let label = format!(
                "{}-{}{} {}:",
                segment.name, field_number, repeat_suffix, item.name
            );
            if item.components.is_empty() {
                out.push_str(&format!("{label:<width$} {}\n", item.value));
            } else {
                out.push_str(&format!("{label:<width$}\n"));
                let last = item.components.len() - 1;
                for (ci, component) in item.components.iter().enumerate() {
                    let branch = if ci == last { '└' } else { '├' };
                    let sub_label = format!("  {}{}:", branch, component.name);
                    out.push_str(&format!("{sub_label:<width$} {}\n", component.value));
                }
            }
        }
    }
    out
}

/// Render every segment-shaped line of a message as an aligned tree,
/// separated by blank lines. Non-segment lines are skipped.
pub fn render_message(text: &str, delims: &Delimiters, schema: &SchemaTables) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for (_, line) in document::lines(text) {
        if document::segment_name(line, delims).is_none() {
            continue;
        }
        blocks.push(render_segment(&Segment::parse(line, delims, schema)));
    }
    blocks.join("\n")
}
