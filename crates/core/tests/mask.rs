//! Tests for identifier masking.

mod common;

use hl7_toolchain_core::transform::mask::mask_component;
use hl7_toolchain_core::{Delimiters, MaskOptions, mask_field, mask_message};

fn opts() -> MaskOptions {
    MaskOptions::default()
}

fn d() -> Delimiters {
    Delimiters::default()
}

// ─── mask_component / mask_field ────────────────────────────────────────────

#[test]
fn mask_every_component() {
    assert_eq!(
        mask_field("test^test2^test3", &d(), None, &opts()),
        "****^*****^*****"
    );
}

#[test]
fn mask_single_component_by_index() {
    assert_eq!(
        mask_field("test^test2^test3", &d(), Some(2), &opts()),
        "test^*****^test3"
    );
}

#[test]
fn out_of_range_component_returns_value_unchanged() {
    assert_eq!(
        mask_field("test^test2^test3", &d(), Some(9), &opts()),
        "test^test2^test3"
    );
    assert_eq!(mask_component("abc", &d(), Some(2), &opts()), "abc");
}

#[test]
fn masking_preserves_non_word_characters() {
    assert_eq!(mask_component("DOE, JOHN-JR", &d(), None, &opts()), "***, ****-**");
}

#[test]
fn underscore_counts_as_word_character() {
    assert_eq!(mask_component("a_b", &d(), None, &opts()), "***");
}

#[test]
fn repeats_are_masked_independently() {
    assert_eq!(mask_field("abc~def^ghi", &d(), None, &opts()), "***~***^***");
    assert_eq!(
        mask_field("one^two~three^four", &d(), Some(1), &opts()),
        "***^two~*****^four"
    );
}

#[test]
fn custom_mask_character() {
    let opts = MaskOptions { mask_char: '#' };
    assert_eq!(mask_field("abc", &d(), None, &opts), "###");
}

// ─── mask_message ───────────────────────────────────────────────────────────

#[test]
fn pid_first_patient_id_repeat_is_preserved() {
    let message = "PID|1|999|111222~333444^^^MRN|ALT|DOE^JOHN";
    let masked = mask_message(message, &d(), &opts());
    let fields: Vec<&str> = masked.split('|').collect();
    assert_eq!(
        fields[3], "111222~******^^^***",
        "first repeat kept, later repeats masked"
    );
    assert_eq!(fields[4], "***", "PID-4 masked in full");
    assert_eq!(fields[5], "***^****", "PID-5 masked in full");
}

#[test]
fn pid_fields_outside_the_list_pass_through() {
    // PID-2 and PID-18 are not in the masked set.
    let message = "PID|1|KEEPME|ID|A|B^C|D|E|F|G|H|I|J|K|L|M|N|O|ACCT123";
    let masked = mask_message(message, &d(), &opts());
    let fields: Vec<&str> = masked.split('|').collect();
    assert_eq!(fields[1], "1", "PID-1 untouched");
    assert_eq!(fields[2], "KEEPME", "PID-2 untouched");
    assert_eq!(fields[18], "ACCT123", "PID-18 untouched");
    assert_eq!(fields[4], "*", "PID-4 masked");
    assert_eq!(fields[17], "*", "PID-17 masked");
}

#[test]
fn nk1_masks_its_fixed_list() {
    let message = "NK1|1|SMITH^JANE|SPO|12 ROAD^^TOWN|5551234";
    let masked = mask_message(message, &d(), &opts());
    let fields: Vec<&str> = masked.split('|').collect();
    assert_eq!(fields[1], "1", "NK1-1 untouched");
    assert_eq!(fields[2], "*****^****", "NK1-2 masked");
    assert_eq!(fields[3], "SPO", "NK1-3 untouched");
    assert_eq!(fields[4], "** ****^^****", "NK1-4 masked");
    assert_eq!(fields[5], "*******", "NK1-5 masked");
}

#[test]
fn insurance_and_guarantor_mask_everything_from_field_two() {
    for name in ["IN1", "IN2", "GT1"] {
        let message = format!("{name}|1|PLAN99|COMPANY^X|DATA");
        let masked = mask_message(&message, &d(), &opts());
        let fields: Vec<String> = masked.split('|').map(str::to_string).collect();
        assert_eq!(fields[1], "1", "{name}-1 untouched");
        assert_eq!(fields[2], "******", "{name}-2 masked");
        assert_eq!(fields[3], "*******^*", "{name}-3 masked");
        assert_eq!(fields[4], "****", "{name}-4 masked");
    }
}

#[test]
fn other_segments_pass_through_unmodified() {
    let message = "MSH|^~\\&|APP|FAC|R|RF|20240101||ADT^A01|ID|P|2.5\rOBX|1|ST|GLU||182";
    let masked = mask_message(message, &d(), &opts());
    assert_eq!(masked, message);
}

#[test]
fn mask_indices_beyond_line_length_are_skipped() {
    // PID with only 5 fields; the mask list reaches 28.
    let message = "PID|1||ID|ALT|DOE";
    let masked = mask_message(message, &d(), &opts());
    assert_eq!(masked, "PID|1||ID|***|***");
}

#[test]
fn output_uses_cr_line_terminators() {
    let message = "MSH|^~\\&|A|B|C|D|E||F|G|P|2.5\nPID|1||ID|ALT\nOBX|1";
    let masked = mask_message(message, &d(), &opts());
    assert!(!masked.contains('\n'), "LF should be replaced: {masked:?}");
    assert_eq!(masked.matches('\r').count(), 2);
}
