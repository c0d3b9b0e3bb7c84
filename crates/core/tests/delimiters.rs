//! Tests for delimiter resolution from message headers.

mod common;

use common::SAMPLE_ADT;
use hl7_toolchain_core::Delimiters;

#[test]
fn standard_header_recovers_standard_set() {
    let d = Delimiters::from_message(SAMPLE_ADT);
    assert_eq!(d, Delimiters::default());
}

#[test]
fn custom_delimiters_recovered_from_header_offsets() {
    // field '#', component '@', repeat '!', escape '$', subcomponent '%'
    let message = "MSH#@!$%#APP#FAC#RAPP#RFAC#20240101##ADT@A01#ID#P#2.5";
    let d = Delimiters::from_message(message);
    assert_eq!(d.field, '#');
    assert_eq!(d.component, '@');
    assert_eq!(d.repeat, '!');
    assert_eq!(d.escape, '$');
    assert_eq!(d.subcomponent, '%');
    assert_eq!(d.encoding_characters(), "@!$%");
}

#[test]
fn no_header_falls_back_to_defaults() {
    let d = Delimiters::from_message("PID|1||123456||DOE^JOHN");
    assert_eq!(d, Delimiters::default());
}

#[test]
fn empty_input_falls_back_to_defaults() {
    assert_eq!(Delimiters::from_message(""), Delimiters::default());
}

#[test]
fn header_too_short_is_skipped() {
    // An MSH line without all five delimiter characters cannot declare a set.
    let d = Delimiters::from_message("MSH|^~\rPID|1");
    assert_eq!(d, Delimiters::default());
}

#[test]
fn batch_headers_also_declare_delimiters() {
    let d = Delimiters::from_message("BHS#@!$%#APP");
    assert_eq!(d.field, '#');
    let d = Delimiters::from_message("FHS#@!$%#APP");
    assert_eq!(d.component, '@');
}

#[test]
fn header_match_is_case_insensitive() {
    let d = Delimiters::from_message("msh#@!$%#APP");
    assert_eq!(d.field, '#');
}

#[test]
fn header_on_a_later_line_is_found() {
    let text = "garbage line\nMSH#@!$%#APP";
    assert_eq!(Delimiters::from_message(text).field, '#');
}
