//! CLI tests for the `hl7 find` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn hl7_cmd() -> Command {
    Command::new(cargo::cargo_bin!("hl7"))
}

fn write_temp_hl7(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.hl7");
    fs::write(&path, content).expect("write temp hl7");
    (dir, path.to_string_lossy().to_string())
}

const MESSAGE: &str = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\rPID|1||123456||DOE^JOHN";

#[test]
fn find_by_location_prints_value() {
    let (_dir, path) = write_temp_hl7(MESSAGE);
    let output = hl7_cmd()
        .args(["find", &path, "PID-3", "--output", "json"])
        .output()
        .expect("run find");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let occurrences = v["occurrences"].as_array().unwrap();
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0]["value"], "123456");
    assert_eq!(occurrences[0]["location"], "PID-3");
}

#[test]
fn find_by_description() {
    let (_dir, path) = write_temp_hl7(MESSAGE);
    let output = hl7_cmd()
        .args(["find", &path, "Patient Name", "--output", "json"])
        .output()
        .expect("run find");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["occurrences"][0]["value"], "DOE^JOHN");
}

#[test]
fn find_empty_query_fails() {
    let (_dir, path) = write_temp_hl7(MESSAGE);
    let output = hl7_cmd()
        .args(["find", &path, "", "--output", "json"])
        .output()
        .expect("run find");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn find_valid_but_absent_succeeds_with_no_occurrences() {
    let (_dir, path) = write_temp_hl7(MESSAGE);
    let output = hl7_cmd()
        .args(["find", &path, "NK1-2", "--output", "json"])
        .output()
        .expect("run find");
    assert!(output.status.success(), "absence is not an error");
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert!(v["occurrences"].as_array().unwrap().is_empty());
}
