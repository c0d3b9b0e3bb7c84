//! Required-field checking.
//!
//! Walks every segment-shaped line of a message and reports the fields the
//! schema marks required (optionality code 2) that are absent or empty.
//! Segments the schema does not know contribute no checks — they are logged
//! and surfaced as informational notes, never flagged as missing.

use std::collections::BTreeMap;

use hl7_toolchain_diagnostics::{Diagnostic, LineIndex, Span, codes};
use hl7_toolchain_schema::SchemaTables;

use crate::delim::Delimiters;
use crate::document;
use crate::location;

/// One required field found absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MissingField {
    /// 0-based line number of the segment the field belongs to.
    pub line: usize,
    /// Segment-relative field location (e.g., `"PID-3"`).
    pub location: String,
}

/// Result of checking a message's required fields.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckResult {
    /// `true` when every required field is present and non-empty.
    pub ok: bool,
    /// Missing or empty required fields, in line-then-field order.
    pub missing: Vec<MissingField>,
    /// The same findings as renderable diagnostics, plus informational
    /// notes for skipped unknown segments.
    pub issues: Vec<Diagnostic>,
}

/// Check every required field of every known segment in `text`.
pub fn check_required_fields(text: &str, schema: &SchemaTables) -> CheckResult {
    let delims = Delimiters::from_message(text);
    let index = LineIndex::new(text);
    let mut missing: Vec<MissingField> = Vec::new();
    let mut issues: Vec<Diagnostic> = Vec::new();
    let mut saw_segment = false;
    let mut saw_header = false;

    for (line_number, line) in document::lines(text) {
        let Some(name) = document::segment_name(line, &delims) else {
            continue;
        };
        saw_segment = true;
        let name = name.to_ascii_uppercase();
        saw_header |= crate::delim::is_header_segment(&name);
        let line_span = index
            .line_start(line_number)
            .map(|start| Span::new(start, start + line.len()));

        if schema.segment(&name).is_none() {
            log::debug!("segment {name} not in schema; required-field check skipped");
            issues.push(
                Diagnostic::info(
                    codes::UNKNOWN_SEGMENT,
                    format!("segment {name} is not in the schema; no required fields checked"),
                    line_span,
                )
                .with_context(context(&name, None, line_number)),
            );
            continue;
        }

        let offset = location::index_offset(&name);
        let tokens: Vec<&str> = line.split(delims.field).collect();

        for (field_number, def) in schema.required_fields(&name) {
            let token_index = field_number as usize - offset;
            let value = tokens.get(token_index);
            let location = format!("{name}-{field_number}");

            let diagnostic = match value {
                None => Diagnostic::error(
                    codes::REQUIRED_FIELD_MISSING,
                    format!(
                        "required field {location} ({}) is missing",
                        def.desc
                    ),
                    line_span,
                ),
                Some(v) if v.is_empty() => Diagnostic::error(
                    codes::REQUIRED_FIELD_EMPTY,
                    format!("required field {location} ({}) is empty", def.desc),
                    line_span,
                ),
                Some(_) => continue,
            };

            issues.push(diagnostic.with_context(context(&name, Some(&location), line_number)));
            missing.push(MissingField {
                line: line_number,
                location,
            });
        }
    }

    if !saw_segment {
        issues.push(Diagnostic::info(
            codes::NO_SEGMENTS,
            "no segment-shaped lines found in input",
            None,
        ));
    } else if !saw_header {
        issues.push(Diagnostic::info(
            codes::MISSING_HEADER,
            "no MSH/BHS/FHS header; standard delimiters assumed",
            None,
        ));
    }

    CheckResult {
        ok: missing.is_empty(),
        missing,
        issues,
    }
}

fn context(
    segment: &str,
    location: Option<&str>,
    line_number: usize,
) -> BTreeMap<String, String> {
    let mut ctx = BTreeMap::from([
        ("segment".to_string(), segment.to_string()),
        ("line".to_string(), (line_number + 1).to_string()),
    ]);
    if let Some(location) = location {
        ctx.insert("location".to_string(), location.to_string());
    }
    ctx
}
