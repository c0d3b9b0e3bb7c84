//! Field search and extraction.
//!
//! Resolves a user query — a `SEG-N` location or a free-text field
//! description — to concrete field occurrences in a message, each with its
//! value and the byte span of that value, so an editor can highlight or
//! select it. An unusable query is reported as [`FindResult::InvalidQuery`],
//! distinct from a valid query that simply matched nothing.

use hl7_toolchain_diagnostics::{LineIndex, Span};
use hl7_toolchain_schema::SchemaTables;

use crate::delim::Delimiters;
use crate::document;
use crate::location::{self, FieldQuery};

/// One field occurrence in a message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldOccurrence {
    /// 0-based line number of the containing segment.
    pub line: usize,
    /// Segment-relative field location (e.g., `"PID-5"`).
    pub location: String,
    /// The field's raw text value.
    pub value: String,
    /// Byte span of the value within the whole message text.
    pub span: Span,
}

/// Result of a field search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindResult {
    /// The query was empty or otherwise unusable.
    InvalidQuery,
    /// Every occurrence of the queried fields, in line-then-field order.
    /// Empty when the query was valid but matched nothing in this message.
    Found(Vec<FieldOccurrence>),
}

/// Find every occurrence of the queried field(s) in `text`.
pub fn find_fields(text: &str, query: &str, schema: &SchemaTables) -> FindResult {
    let resolved = match location::find_locations(query, text, schema) {
        FieldQuery::Invalid => return FindResult::InvalidQuery,
        FieldQuery::Resolved(map) => map,
    };

    let delims = Delimiters::from_message(text);
    let index = LineIndex::new(text);
    let mut occurrences: Vec<FieldOccurrence> = Vec::new();

    for (line_number, line) in document::lines(text) {
        let Some(name) = document::segment_name(line, &delims) else {
            continue;
        };
        let name = name.to_ascii_uppercase();
        let Some(indices) = resolved.get(&name) else {
            continue;
        };
        let line_start = index.line_start(line_number).unwrap_or(0);
        let offsets = token_offsets(line, delims.field);
        let display_offset = location::index_offset(&name) as u32;

        for &token_index in indices {
            let field_number = token_index + display_offset;
            let location = format!("{name}-{field_number}");

            // Header field 1 is the delimiter consumed by the split; it has
            // no token of its own.
            if display_offset == 1 && token_index == 0 {
                let span_start = line_start + 3;
                occurrences.push(FieldOccurrence {
                    line: line_number,
                    location,
                    value: delims.field.to_string(),
                    span: Span::new(span_start, span_start + delims.field.len_utf8()),
                });
                continue;
            }

            let Some(&(start, end)) = offsets.get(token_index as usize) else {
                continue;
            };
            occurrences.push(FieldOccurrence {
                line: line_number,
                location,
                value: line[start..end].to_string(),
                span: Span::new(line_start + start, line_start + end),
            });
        }
    }
    FindResult::Found(occurrences)
}

/// Byte ranges of each field-delimited token within a line.
fn token_offsets(line: &str, field: char) -> Vec<(usize, usize)> {
    let mut offsets = Vec::new();
    let mut start = 0usize;
    for token in line.split(field) {
        offsets.push((start, start + token.len()));
        start += token.len() + field.len_utf8();
    }
    offsets
}
