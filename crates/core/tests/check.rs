//! Tests for the required-field checker.

mod common;

use common::{SAMPLE_ADT, TABLES};
use hl7_toolchain_core::{Severity, check_required_fields, codes};

#[test]
fn complete_message_passes() {
    let result = check_required_fields(SAMPLE_ADT, &TABLES);
    assert!(result.ok, "missing: {:?}", result.missing);
    assert!(result.missing.is_empty());
}

#[test]
fn empty_and_absent_required_fields_are_both_reported() {
    // PID-3 (Patient Identifier List) is present but empty; PID-5 (Patient
    // Name) is absent because the line ends early.
    let message = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\rPID|1||";
    let result = check_required_fields(message, &TABLES);
    assert!(!result.ok);
    assert_eq!(result.missing.len(), 2);

    assert_eq!(result.missing[0].line, 1);
    assert_eq!(result.missing[0].location, "PID-3");
    assert_eq!(result.missing[1].line, 1);
    assert_eq!(result.missing[1].location, "PID-5");

    let codes_seen: Vec<&str> = result
        .issues
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.id.as_ref())
        .collect();
    assert_eq!(
        codes_seen,
        vec![codes::REQUIRED_FIELD_EMPTY, codes::REQUIRED_FIELD_MISSING]
    );
}

#[test]
fn results_are_in_line_then_field_order() {
    let message = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\r\
                   PID|1||\r\
                   PV1|1";
    let result = check_required_fields(message, &TABLES);
    let locations: Vec<(usize, &str)> = result
        .missing
        .iter()
        .map(|m| (m.line, m.location.as_str()))
        .collect();
    assert_eq!(
        locations,
        vec![(1, "PID-3"), (1, "PID-5"), (2, "PV1-2")]
    );
}

#[test]
fn header_offset_applies_to_msh_checks() {
    // A complete MSH line: all five required MSH fields present.
    let complete = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5";
    assert!(check_required_fields(complete, &TABLES).ok);

    // Empty MSH-10 (Message Control ID) is flagged at the right location.
    let missing_control = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01||P|2.5";
    let result = check_required_fields(missing_control, &TABLES);
    assert!(!result.ok);
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].location, "MSH-10");
}

#[test]
fn unknown_segments_contribute_no_required_checks() {
    let message = "ZA1|only|custom|data";
    let result = check_required_fields(message, &TABLES);
    assert!(result.ok);
    assert!(result.missing.is_empty());
    // But the skip is surfaced as an informational note.
    let note = result
        .issues
        .iter()
        .find(|d| d.id == codes::UNKNOWN_SEGMENT)
        .expect("unknown-segment note");
    assert_eq!(note.severity, Severity::Info);
}

#[test]
fn diagnostics_carry_location_context_and_spans() {
    let message = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\rPID|1||";
    let result = check_required_fields(message, &TABLES);
    let diag = result
        .issues
        .iter()
        .find(|d| d.id == codes::REQUIRED_FIELD_EMPTY)
        .expect("empty-field diagnostic");
    let ctx = diag.context.as_ref().expect("context map");
    assert_eq!(ctx.get("location").unwrap(), "PID-3");
    assert_eq!(ctx.get("segment").unwrap(), "PID");
    assert_eq!(ctx.get("line").unwrap(), "2", "context line is 1-based");
    let span = diag.span.expect("line span");
    assert_eq!(&message[span.start..span.end], "PID|1||");
}

#[test]
fn input_without_segments_notes_it() {
    let result = check_required_fields("nothing here", &TABLES);
    assert!(result.ok);
    assert!(result.issues.iter().any(|d| d.id == codes::NO_SEGMENTS));
}
