//! Tests for field search and extraction.

mod common;

use common::{SAMPLE_ADT, TABLES};
use hl7_toolchain_core::{FindResult, find_fields};

fn found(query: &str, text: &str) -> Vec<hl7_toolchain_core::FieldOccurrence> {
    match find_fields(text, query, &TABLES) {
        FindResult::Found(occurrences) => occurrences,
        FindResult::InvalidQuery => panic!("query {query:?} should be valid"),
    }
}

#[test]
fn find_by_direct_location() {
    let occurrences = found("PID-3", SAMPLE_ADT);
    assert_eq!(occurrences.len(), 1);
    let hit = &occurrences[0];
    assert_eq!(hit.location, "PID-3");
    assert_eq!(hit.value, "123456~789012^^^MRN");
    assert_eq!(hit.line, 2);
    assert_eq!(&SAMPLE_ADT[hit.span.start..hit.span.end], hit.value);
}

#[test]
fn find_header_field_applies_offset() {
    let occurrences = found("MSH-9", SAMPLE_ADT);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].value, "ADT^A01");
    assert_eq!(occurrences[0].location, "MSH-9");
}

#[test]
fn msh_1_is_the_field_delimiter() {
    let occurrences = found("MSH-1", SAMPLE_ADT);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].value, "|");
    assert_eq!(&SAMPLE_ADT[occurrences[0].span.start..occurrences[0].span.end], "|");
}

#[test]
fn find_by_description() {
    let occurrences = found("Patient Name", SAMPLE_ADT);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].location, "PID-5");
    assert_eq!(occurrences[0].value, "DOE^JOHN^A");
}

#[test]
fn every_matching_line_is_reported() {
    let text = "PID|1||111\rPID|2||222";
    let occurrences = found("PID-3", text);
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].value, "111");
    assert_eq!(occurrences[0].line, 0);
    assert_eq!(occurrences[1].value, "222");
    assert_eq!(occurrences[1].line, 1);
}

#[test]
fn valid_location_absent_from_message_yields_empty() {
    let occurrences = found("NK1-2", SAMPLE_ADT);
    assert!(occurrences.is_empty(), "valid query, no NK1 lines: {occurrences:?}");
}

#[test]
fn field_beyond_line_length_is_skipped() {
    let occurrences = found("PID-30", SAMPLE_ADT);
    assert!(occurrences.is_empty());
}

#[test]
fn empty_query_is_invalid_not_empty() {
    assert_eq!(
        find_fields(SAMPLE_ADT, "", &TABLES),
        FindResult::InvalidQuery
    );
}

#[test]
fn spans_are_relative_to_the_whole_text() {
    let occurrences = found("PV1-2", SAMPLE_ADT);
    assert_eq!(occurrences.len(), 1);
    let hit = &occurrences[0];
    assert_eq!(hit.value, "I");
    assert_eq!(&SAMPLE_ADT[hit.span.start..hit.span.end], "I");
}
