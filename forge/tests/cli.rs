//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_stages_text() {
    Command::cargo_bin("forge")
        .unwrap()
        .arg("stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("The Spark"))
        .stdout(predicate::str::contains("Under the Hood"))
        .stdout(predicate::str::contains("7+"));
}

#[test]
fn test_stages_json() {
    let output = Command::cargo_bin("forge")
        .unwrap()
        .args(["stages", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["stage"], "spark");
    assert_eq!(rows[4]["isComplete"], true);
    assert!(rows[4].get("form").is_none());
}

#[test]
fn test_unknown_format_rejected() {
    Command::cargo_bin("forge")
        .unwrap()
        .args(["stages", "--format", "table"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("forge").unwrap().arg("--version").assert().success();
}
