//! Command-line tests for the wsbench binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_options() {
    Command::cargo_bin("wsbench")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--chrome"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--browser-timeout"));
}

#[test]
fn test_version() {
    Command::cargo_bin("wsbench")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("wsbench "));
}

#[test]
fn test_missing_output_dir_is_a_config_error() {
    Command::cargo_bin("wsbench")
        .unwrap()
        .args(["--output-dir", "/nonexistent/wsbench-reports"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("output directory"));
}

#[test]
fn test_unknown_flag_rejected() {
    Command::cargo_bin("wsbench")
        .unwrap()
        .arg("--thresholds")
        .assert()
        .failure();
}
