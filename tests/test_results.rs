use analyzer_gate::results::{ReportFormat, Results, ResultsError};
use analyzer_gate::violation::{Violation, ViolationLocation};
use std::io::Write;
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn point(file: &str, line: Option<u64>, column: Option<u64>) -> ViolationLocation {
    ViolationLocation::Point {
        file: file.to_string(),
        line,
        column,
    }
}

fn violation(severity: u8, engine: &str, rule: &str, location: ViolationLocation) -> Violation {
    Violation {
        severity,
        engine: engine.to_string(),
        rule: rule.to_string(),
        url: None,
        message: "msg".to_string(),
        location,
    }
}

// ---------------------------------------------------------------------------
// Unified shape
// ---------------------------------------------------------------------------

#[test]
fn unified_report_parses_and_buckets_by_severity() {
    let results = Results::from_file(&fixture("unified_results.json"), None).unwrap();

    assert_eq!(results.total_count(), 5);
    assert_eq!(results.count_for_severity(1), 2);
    assert_eq!(results.count_for_severity(2), 0);
    assert_eq!(results.count_for_severity(3), 3);

    let sorted = results.sorted_by_severity();
    assert_eq!(sorted.len(), 5);
    for v in &sorted[..2] {
        assert_eq!(v.severity, 1);
    }
    for v in &sorted[2..] {
        assert_eq!(v.severity, 3);
    }
}

#[test]
fn unified_report_extracts_fields_and_primary_location() {
    let results = Results::from_file(&fixture("unified_results.json"), None).unwrap();
    let sorted = results.sorted_by_severity();

    // primaryLocationIndex = 1 selects the second entry of the locations
    // array, so both sev-1 violations land in AccountHandler.cls. With the
    // file tied, line order decides: line 1 sorts before line 12.
    let first = &sorted[0];
    assert_eq!(first.engine, "pmd");
    assert_eq!(first.rule, "ApexSharingViolations");
    // Empty resources array means no rule URL.
    assert_eq!(first.url, None);
    assert_eq!(
        first.location.to_string(),
        "force-app/main/default/classes/AccountHandler.cls:1"
    );

    let second = &sorted[1];
    assert_eq!(second.rule, "ApexCRUDViolation");
    assert_eq!(
        second.url.as_deref(),
        Some("https://docs.pmd-code.org/latest/pmd_rules_apex_security.html#apexcrudviolation")
    );
    assert_eq!(
        second.location.to_string(),
        "force-app/main/default/classes/AccountHandler.cls:12:3"
    );
}

#[test]
fn unified_location_without_line_renders_bare_file() {
    let results = Results::from_file(&fixture("unified_results.json"), None).unwrap();
    let bare = results
        .sorted_by_severity()
        .iter()
        .find(|v| v.rule == "VfUnescapeEl")
        .unwrap();
    assert_eq!(
        bare.location.to_string(),
        "force-app/main/default/pages/Sample.page"
    );
}

#[test]
fn primary_location_index_out_of_bounds_is_a_shape_error() {
    let json = r#"{ "violations": [ {
        "rule": "r", "engine": "e", "severity": 1, "message": "m",
        "primaryLocationIndex": 3,
        "locations": [ { "file": "f" } ],
        "resources": []
    } ] }"#;
    let err = Results::parse(json, None, Path::new("/work")).unwrap_err();
    assert!(matches!(err, ResultsError::Shape(_)));
}

// ---------------------------------------------------------------------------
// Per-file shape
// ---------------------------------------------------------------------------

#[test]
fn per_file_report_parses_with_relative_paths() {
    let json = std::fs::read_to_string(fixture("per_file_results.json")).unwrap();
    let results = Results::parse(&json, None, Path::new("/work/sample-project")).unwrap();

    assert_eq!(results.total_count(), 3);
    assert_eq!(results.count_for_severity(1), 2);
    assert_eq!(results.count_for_severity(3), 1);

    let sorted = results.sorted_by_severity();
    assert_eq!(sorted[0].severity, 1);
    assert_eq!(sorted[0].engine, "pmd");
    // Absolute path under the working directory was rewritten relative.
    assert_eq!(
        sorted[0].location.to_string(),
        "force-app/main/default/classes/AccountHandler.cls:1"
    );
}

#[test]
fn per_file_paths_outside_working_dir_are_untouched() {
    let json = std::fs::read_to_string(fixture("per_file_results.json")).unwrap();
    let results = Results::parse(&json, None, Path::new("/elsewhere")).unwrap();
    assert!(results
        .sorted_by_severity()
        .iter()
        .all(|v| v.location.to_string().starts_with("/work/sample-project/")));
}

#[test]
fn per_file_dataflow_report_parses_source_sink_locations() {
    let json = std::fs::read_to_string(fixture("per_file_dfa_results.json")).unwrap();
    let results = Results::parse(
        &json,
        Some(ReportFormat::PerFileDataflow),
        Path::new("/work/sample-project"),
    )
    .unwrap();

    assert_eq!(results.total_count(), 2);
    let sorted = results.sorted_by_severity();
    assert_eq!(sorted[0].rule, "ApexFlsViolationRule");
    assert_eq!(
        sorted[0].location.to_string(),
        "Source: force-app/main/default/classes/NameController.cls:5:26\n\
         Sink: force-app/main/default/classes/UnsafeSOQL.cls:4:9"
    );
    // Sink column missing on the second entry.
    assert_eq!(
        sorted[1].location.to_string(),
        "Source: force-app/main/default/classes/NameController.cls:9:12\n\
         Sink: force-app/main/default/classes/UnsafeSOQL.cls:4"
    );
}

#[test]
fn dataflow_flag_is_authoritative_over_detection() {
    // Without the explicit data-flow hint, an array root parses as plain
    // per-file and the source/sink fields are ignored.
    let json = std::fs::read_to_string(fixture("per_file_dfa_results.json")).unwrap();
    let results = Results::parse(&json, None, Path::new("/work/sample-project")).unwrap();
    assert!(results
        .sorted_by_severity()
        .iter()
        .all(|v| matches!(v.location, ViolationLocation::Point { .. })));
}

// ---------------------------------------------------------------------------
// Fatal error policy
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_a_fatal_io_error() {
    let err = Results::from_file(Path::new("does/not/exist.json"), None).unwrap_err();
    assert!(matches!(err, ResultsError::Io { .. }));
}

#[test]
fn malformed_json_is_a_fatal_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = Results::from_file(file.path(), None).unwrap_err();
    assert!(matches!(err, ResultsError::Json(_)));
}

#[test]
fn scalar_root_is_a_shape_error() {
    let err = Results::parse("42", None, Path::new("/work")).unwrap_err();
    assert!(matches!(err, ResultsError::Shape(_)));
}

// ---------------------------------------------------------------------------
// Sorted view caching
// ---------------------------------------------------------------------------

#[test]
fn sorted_view_is_memoized_and_idempotent() {
    let results = Results::new(vec![
        violation(3, "e", "r1", point("b", Some(1), None)),
        violation(1, "e", "r2", point("a", Some(2), None)),
        violation(3, "e", "r3", point("a", Some(9), None)),
    ]);

    let first: Vec<String> = results
        .sorted_by_severity()
        .iter()
        .map(|v| v.rule.clone())
        .collect();
    let second: Vec<String> = results
        .sorted_by_severity()
        .iter()
        .map(|v| v.rule.clone())
        .collect();

    assert_eq!(first, vec!["r2", "r3", "r1"]);
    assert_eq!(first, second);
    // Same allocation both times — the view is computed once.
    assert!(std::ptr::eq(
        results.sorted_by_severity().as_ptr(),
        results.sorted_by_severity().as_ptr()
    ));
}

#[test]
fn counts_cover_the_full_severity_domain() {
    let results = Results::new(vec![
        violation(1, "e", "r1", point("a", None, None)),
        violation(2, "e", "r2", point("a", None, None)),
        violation(4, "e", "r3", point("a", None, None)),
        violation(5, "e", "r4", point("a", None, None)),
        violation(5, "e", "r5", point("a", None, None)),
    ]);
    assert_eq!(results.total_count(), 5);
    assert_eq!(results.count_for_severity(1), 1);
    assert_eq!(results.count_for_severity(2), 1);
    assert_eq!(results.count_for_severity(3), 0);
    assert_eq!(results.count_for_severity(4), 1);
    assert_eq!(results.count_for_severity(5), 2);
}
