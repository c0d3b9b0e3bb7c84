//! Field location grammar and description search.
//!
//! A field location names one field of one segment kind: `PID-3`, optionally
//! with a component suffix (`PID-3.1`). The grammar is a three-character
//! segment name (letter, letter, alphanumeric), a dash, a field number that
//! must not start with zero, and an optional dotted component number —
//! matched by explicit character scanning rather than a regex, which keeps
//! the algorithm stateless and trivially testable.
//!
//! Free-text queries that do not parse as a location are resolved against
//! the schema's field descriptions instead ([`find_locations`]).

use std::collections::BTreeMap;

use hl7_toolchain_schema::SchemaTables;

use crate::delim::{Delimiters, is_header_segment};
use crate::document;

/// A parsed field location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Upper-cased three-character segment name.
    pub segment: String,
    /// 1-based field number (never 0).
    pub field: u32,
    /// Optional 1-based component number from a `.M` suffix.
    ///
    /// Recognized by the grammar but not consulted by field-level lookups;
    /// component targeting is a separate parameter on the masking functions.
    pub component: Option<u32>,
}

impl Location {
    /// Parse a location string (case-insensitive). `None` when the string
    /// does not match the grammar — including a field number of 0.
    pub fn parse(input: &str) -> Option<Location> {
        let s = input.trim();
        let bytes = s.as_bytes();
        // Shortest form is `XXX-N`.
        if bytes.len() < 5 {
            return None;
        }
        if !(bytes[0].is_ascii_alphabetic()
            && bytes[1].is_ascii_alphabetic()
            && bytes[2].is_ascii_alphanumeric()
            && bytes[3] == b'-')
        {
            return None;
        }
        let rest = &s[4..];
        let (field_part, component_part) = match rest.split_once('.') {
            Some((f, c)) => (f, Some(c)),
            None => (rest, None),
        };
        if field_part.is_empty()
            || field_part.len() > 3
            || field_part.starts_with('0')
            || !field_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let field = field_part.parse().ok()?;
        let component = match component_part {
            None => None,
            Some(c) if !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()) => {
                Some(c.parse().ok()?)
            }
            Some(_) => return None,
        };
        Some(Location {
            segment: s[..3].to_ascii_uppercase(),
            field,
            component,
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.segment, self.field)?;
        if let Some(component) = self.component {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}

/// Whether `input` is a valid field-level location: it matches the grammar
/// and carries no component suffix. `"PID-3"` is valid; `"PID-0"`,
/// `"ID-3"`, and `"PID-A"` are not.
pub fn is_item_location_valid(input: &str) -> bool {
    Location::parse(input).is_some_and(|l| l.component.is_none())
}

/// The segment-name portion of a location string: its first three
/// characters (the whole string when shorter).
pub fn segment_name(input: &str) -> &str {
    input.get(..3).unwrap_or(input)
}

/// The field number of a location string: the digits after the first `-`,
/// up to (not including) an optional `.` suffix. `None` when there is no
/// `-` or the digits do not parse.
pub fn field_index(input: &str) -> Option<u32> {
    let (_, rest) = input.split_once('-')?;
    let digits = rest.split('.').next().unwrap_or("");
    digits.parse().ok()
}

/// Field-index offset for a segment name: 1 for the header segments
/// (MSH/BHS/FHS, applied uniformly), 0 otherwise.
///
/// The raw field array of a split header line starts at field 2 — field 1
/// is the delimiter that was consumed by the split — so array positions for
/// headers sit one lower than the field number.
pub fn index_offset(segment: &str) -> usize {
    if is_header_segment(segment) { 1 } else { 0 }
}

/// Result of resolving a user query to field positions.
///
/// `Invalid` (an empty or unusable query) is deliberately distinct from a
/// `Resolved` map with no entries (a well-formed query that matched
/// nothing), so callers can phrase feedback accordingly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldQuery {
    /// The query was empty or otherwise not usable.
    Invalid,
    /// Raw split-array indices of matching fields, keyed by segment name.
    /// The header offset is already applied; index order follows schema
    /// field order.
    Resolved(BTreeMap<String, Vec<u32>>),
}

/// Resolve `query` to field positions within `text`.
///
/// A location-shaped query (`SEG-N`, optionally `.M` — the component part
/// is dropped) resolves directly to its offset-adjusted index. Anything
/// else is treated as a case-insensitive substring over the field
/// descriptions of every segment name actually present in `text`; segments
/// with no matches are omitted, and segments absent from the schema are
/// skipped entirely.
pub fn find_locations(query: &str, text: &str, schema: &SchemaTables) -> FieldQuery {
    let query = query.trim();
    if query.is_empty() {
        return FieldQuery::Invalid;
    }

    let mut resolved: BTreeMap<String, Vec<u32>> = BTreeMap::new();

    if let Some(location) = Location::parse(query) {
        let offset = index_offset(&location.segment) as u32;
        resolved.insert(location.segment, vec![location.field - offset]);
        return FieldQuery::Resolved(resolved);
    }

    let delims = Delimiters::from_message(text);
    let needle = query.to_lowercase();
    for (_, line) in document::lines(text) {
        let Some(name) = document::segment_name(line, &delims) else {
            continue;
        };
        let name = name.to_ascii_uppercase();
        if resolved.contains_key(&name) {
            continue;
        }
        let Some(def) = schema.segment(&name) else {
            log::debug!("segment {name} not in schema; skipping description search");
            continue;
        };
        let offset = index_offset(&name) as u32;
        let indices: Vec<u32> = def
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.desc.to_lowercase().contains(&needle))
            .map(|(i, _)| i as u32 + 1 - offset)
            .collect();
        if !indices.is_empty() {
            resolved.insert(name, indices);
        }
    }
    FieldQuery::Resolved(resolved)
}
