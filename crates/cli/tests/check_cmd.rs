//! CLI tests for the `hl7 check` subcommand.

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

const COMPLETE: &str = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\rPID|1||123||DOE^JOHN\rPV1|1|I";

#[test]
fn check_ok_exits_zero() {
    let (_dir, path) = write_temp_hl7(COMPLETE);
    let output = hl7_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["ok"], true);
    assert!(v["missing"].as_array().unwrap().is_empty());
}

#[test]
fn check_missing_fields_exits_one_and_lists_them() {
    let (_dir, path) = write_temp_hl7("MSH|^~\\&|A|B|C|D|20240101||ADT^A01|ID|P|2.5\rPID|1||");
    let output = hl7_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(1));

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["ok"], false);
    let missing = v["missing"].as_array().unwrap();
    let locations: Vec<&str> = missing
        .iter()
        .map(|m| m["location"].as_str().unwrap())
        .collect();
    assert_eq!(locations, vec!["PID-3", "PID-5"]);
}

#[test]
fn check_reads_stdin_with_dash() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = hl7_cmd()
        .args(["check", "-", "--output", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn check");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(COMPLETE.as_bytes())
        .unwrap();
    let output = child.wait_with_output().expect("wait for check");
    assert!(output.status.success());
}

#[test]
fn check_accepts_explicit_hl7_version() {
    let (_dir, path) = write_temp_hl7(COMPLETE);
    for version in ["2.1", "2.5", "2.9"] {
        let output = hl7_cmd()
            .args(["check", &path, "--hl7-version", version, "--output", "json"])
            .output()
            .expect("run check");
        assert!(output.status.success(), "version {version}");
    }
}

#[test]
fn check_rejects_unknown_version() {
    let (_dir, path) = write_temp_hl7(COMPLETE);
    let output = hl7_cmd()
        .args(["check", &path, "--hl7-version", "3.0"])
        .output()
        .expect("run check");
    assert!(!output.status.success());
}
