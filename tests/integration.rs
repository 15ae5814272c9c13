use assert_cmd::Command;
use predicates::prelude::*;

fn analyzer_gate() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("analyzer-gate")
}

#[test]
fn summarize_unified_results() {
    analyzer_gate()
        .args(["summarize", "tests/fixtures/unified_results.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Code Analyzer Results"))
        .stdout(predicate::str::contains("5 Violation(s) Found"))
        .stdout(predicate::str::contains(
            ":red_circle: 2 High severity violation(s)",
        ));
}

#[test]
fn summarize_empty_results_prints_success_block() {
    analyzer_gate()
        .args(["summarize", "tests/fixtures/empty_results.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ":white_check_mark: 0 Violations Found",
        ));
}

#[test]
fn summarize_dataflow_results_with_explicit_format() {
    analyzer_gate()
        .args([
            "summarize",
            "tests/fixtures/per_file_dfa_results.json",
            "--format",
            "per-file-dataflow",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<b>Source</b>"))
        .stdout(predicate::str::contains("<b>Sink</b>"));
}

#[test]
fn summarize_writes_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summary.md");

    analyzer_gate()
        .args(["summarize", "tests/fixtures/unified_results.json"])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("## Code Analyzer Results\n"));
}

#[test]
fn summarize_missing_file_fails_with_error() {
    analyzer_gate()
        .args(["summarize", "no/such/file.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read results file"));
}

#[test]
fn counts_reports_severity_buckets_as_json() {
    let output = analyzer_gate()
        .args(["counts", "tests/fixtures/unified_results.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("JSON should be valid");
    assert_eq!(parsed["total"], 5);
    assert_eq!(parsed["sev1"], 2);
    assert_eq!(parsed["sev2"], 0);
    assert_eq!(parsed["sev3"], 3);
}

#[test]
fn counts_malformed_results_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ definitely not json").unwrap();

    analyzer_gate()
        .args(["counts", bad.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse results file"));
}
