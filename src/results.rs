//! Results parsing and the violation collection.
//!
//! The external analyzer writes its findings to a JSON file. Two report
//! shapes exist across tool versions:
//!
//! - **Unified** — a single object with a `violations` array; each entry
//!   selects its primary location by index into a `locations` array.
//! - **Per-file** — an array of file-result objects, each grouping the
//!   violations found in one file. A data-flow sub-kind replaces the plain
//!   line/column with source and sink coordinates.
//!
//! [`Results::from_file`] reads one report and flattens every violation
//! into a single [`Results`] collection. A report that cannot be read or
//! parsed is a **fatal** condition: the error propagates instead of being
//! swallowed, because severity counts and summaries derived from a
//! half-parsed report would be silently wrong.

use crate::violation::{Violation, ViolationLocation};
use std::path::Path;
use std::sync::OnceLock;

/// Which JSON report shape to expect.
///
/// When the caller knows the shape (it follows from which analyzer command
/// was run), the explicit value is authoritative. [`ReportFormat::detect`]
/// only discriminates on the JSON root value and never guesses the
/// data-flow sub-kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Object root: `{ "violations": [...] }` with indexed locations.
    Unified,
    /// Array root: per-file groups with `line`/`column` coordinates.
    PerFile,
    /// Array root: per-file groups with source/sink coordinates.
    PerFileDataflow,
}

impl ReportFormat {
    /// Picks a shape from the root JSON value: object roots are
    /// [`Unified`](ReportFormat::Unified), array roots are
    /// [`PerFile`](ReportFormat::PerFile). Data-flow reports cannot be
    /// detected structurally — callers holding one must say so.
    pub fn detect(root: &serde_json::Value) -> Result<ReportFormat, ResultsError> {
        if root.is_object() {
            Ok(ReportFormat::Unified)
        } else if root.is_array() {
            Ok(ReportFormat::PerFile)
        } else {
            Err(ResultsError::Shape(
                "results root must be a JSON object or array".to_string(),
            ))
        }
    }
}

/// Errors from reading or parsing a results file. Always fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("failed to read results file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse results file as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected results file shape: {0}")]
    Shape(String),
}

/// An immutable collection of [`Violation`]s for one analysis run.
///
/// Violations are held in parse order. The severity-sorted view is computed
/// lazily on first request and memoized; per-severity counts are cheap
/// filters recomputed per call.
#[derive(Debug)]
pub struct Results {
    violations: Vec<Violation>,
    sorted: OnceLock<Vec<Violation>>,
}

impl Results {
    /// Wraps an already-parsed violation list (parse order preserved).
    pub fn new(violations: Vec<Violation>) -> Self {
        Results {
            violations,
            sorted: OnceLock::new(),
        }
    }

    /// Reads and parses a results file.
    ///
    /// With `format = None` the shape is detected from the JSON root (see
    /// [`ReportFormat::detect`]). Absolute file paths inside the current
    /// working directory are rewritten to their relative form.
    ///
    /// # Errors
    ///
    /// Any read failure, JSON syntax error, or shape mismatch is returned
    /// as a [`ResultsError`] — a malformed results file terminates the run.
    pub fn from_file(path: &Path, format: Option<ReportFormat>) -> Result<Results, ResultsError> {
        let json = std::fs::read_to_string(path).map_err(|source| ResultsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let working_dir = std::env::current_dir().unwrap_or_default();
        Self::parse(&json, format, &working_dir)
    }

    /// Parses report JSON against an explicit working directory.
    ///
    /// Split out from [`Results::from_file`] so path relativization is
    /// testable without changing the process working directory.
    pub fn parse(
        json: &str,
        format: Option<ReportFormat>,
        working_dir: &Path,
    ) -> Result<Results, ResultsError> {
        let root: serde_json::Value = serde_json::from_str(json)?;
        let format = match format {
            Some(f) => f,
            None => ReportFormat::detect(&root)?,
        };
        let violations = match format {
            ReportFormat::Unified => parse_unified(root)?,
            ReportFormat::PerFile => parse_per_file(root, false, working_dir)?,
            ReportFormat::PerFileDataflow => parse_per_file(root, true, working_dir)?,
        };
        Ok(Results::new(violations))
    }

    /// Total number of violations in the report.
    pub fn total_count(&self) -> usize {
        self.violations.len()
    }

    /// Number of violations at exactly the given severity level.
    pub fn count_for_severity(&self, severity: u8) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// The violations ordered by [`Violation::compare`] (most severe
    /// first). Sorted once on first call and memoized; subsequent calls
    /// return the same ordering.
    pub fn sorted_by_severity(&self) -> &[Violation] {
        self.sorted.get_or_init(|| {
            let mut sorted = self.violations.clone();
            sorted.sort_by(Violation::compare);
            sorted
        })
    }
}

// ---------------------------------------------------------------------------
// Unified shape (object root)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct UnifiedReport {
    violations: Vec<UnifiedViolation>,
}

#[derive(serde::Deserialize)]
struct UnifiedViolation {
    severity: u8,
    engine: String,
    rule: String,
    #[serde(default)]
    resources: Vec<String>,
    message: String,
    #[serde(rename = "primaryLocationIndex")]
    primary_location_index: usize,
    #[serde(default)]
    locations: Vec<UnifiedLocation>,
}

#[derive(serde::Deserialize)]
struct UnifiedLocation {
    file: String,
    #[serde(rename = "startLine")]
    start_line: Option<u64>,
    #[serde(rename = "startColumn")]
    start_column: Option<u64>,
}

fn parse_unified(root: serde_json::Value) -> Result<Vec<Violation>, ResultsError> {
    let report: UnifiedReport = serde_json::from_value(root)?;
    let mut violations = Vec::with_capacity(report.violations.len());
    for entry in report.violations {
        let primary = entry
            .locations
            .get(entry.primary_location_index)
            .ok_or_else(|| {
                ResultsError::Shape(format!(
                    "primaryLocationIndex {} is out of bounds for {} location(s)",
                    entry.primary_location_index,
                    entry.locations.len()
                ))
            })?;
        violations.push(Violation {
            severity: entry.severity,
            engine: entry.engine,
            rule: entry.rule,
            url: entry.resources.first().cloned(),
            message: entry.message,
            location: ViolationLocation::Point {
                file: primary.file.clone(),
                line: primary.start_line,
                column: primary.start_column,
            },
        });
    }
    Ok(violations)
}

// ---------------------------------------------------------------------------
// Per-file shape (array root)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct FileResult {
    #[serde(rename = "fileName")]
    file_name: String,
    engine: String,
    violations: Vec<FileViolation>,
}

#[derive(serde::Deserialize)]
struct FileViolation {
    #[serde(rename = "normalizedSeverity")]
    normalized_severity: u8,
    #[serde(rename = "ruleName")]
    rule_name: String,
    url: Option<String>,
    message: String,
    line: Option<u64>,
    column: Option<u64>,
    #[serde(rename = "sourceLine")]
    source_line: Option<u64>,
    #[serde(rename = "sourceColumn")]
    source_column: Option<u64>,
    #[serde(rename = "sinkFileName")]
    sink_file_name: Option<String>,
    #[serde(rename = "sinkLine")]
    sink_line: Option<u64>,
    #[serde(rename = "sinkColumn")]
    sink_column: Option<u64>,
}

fn parse_per_file(
    root: serde_json::Value,
    dataflow: bool,
    working_dir: &Path,
) -> Result<Vec<Violation>, ResultsError> {
    let groups: Vec<FileResult> = serde_json::from_value(root)?;
    let mut violations = Vec::new();
    for group in groups {
        let file = relativize(&group.file_name, working_dir);
        for v in group.violations {
            let location = if dataflow {
                ViolationLocation::SourceSink {
                    source_file: file.clone(),
                    source_line: v.source_line,
                    source_column: v.source_column,
                    // A data-flow entry without a sink still renders; an
                    // empty sink file beats failing the whole report.
                    sink_file: v
                        .sink_file_name
                        .map(|f| relativize(&f, working_dir))
                        .unwrap_or_default(),
                    sink_line: v.sink_line,
                    sink_column: v.sink_column,
                }
            } else {
                ViolationLocation::Point {
                    file: file.clone(),
                    line: v.line,
                    column: v.column,
                }
            };
            violations.push(Violation {
                severity: v.normalized_severity,
                engine: group.engine.clone(),
                rule: v.rule_name,
                url: v.url,
                message: v.message,
                location,
            });
        }
    }
    Ok(violations)
}

/// Rewrites an absolute path inside `working_dir` to its relative form.
/// Paths outside the working directory (or already relative) pass through.
fn relativize(file: &str, working_dir: &Path) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        if let Ok(relative) = path.strip_prefix(working_dir) {
            return relative.display().to_string();
        }
    }
    file.to_string()
}
