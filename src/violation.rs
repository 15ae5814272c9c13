//! Core data types for analyzer findings.
//!
//! A [`Violation`] is one finding reported by the external analysis tool: a
//! rule match at a [`ViolationLocation`]. Both types are immutable once the
//! results parser builds them and define the total order used for display
//! grouping (most severe first, then by location, engine, and rule).

use std::cmp::Ordering;
use std::fmt;

/// Where a finding occurred.
///
/// Ordinary findings carry a single [`Point`](ViolationLocation::Point);
/// data-flow findings link an origin to a destination with
/// [`SourceSink`](ViolationLocation::SourceSink).
///
/// Line and column are optional: some engines report file-level findings
/// with no position at all, and a column without a line is tolerated rather
/// than rejected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationLocation {
    Point {
        file: String,
        line: Option<u64>,
        column: Option<u64>,
    },
    SourceSink {
        source_file: String,
        source_line: Option<u64>,
        source_column: Option<u64>,
        sink_file: String,
        sink_line: Option<u64>,
        sink_column: Option<u64>,
    },
}

impl ViolationLocation {
    /// Total order over locations.
    ///
    /// Point locations compare by file, then line, then column; a missing
    /// line or column sorts **after** any present one, so findings with
    /// position information group first. Source/sink locations compare the
    /// source triple then the sink triple with the same rules.
    ///
    /// The two variants never interleave: a `Point` always sorts before a
    /// `SourceSink`. A single report should never mix them, but a mixed
    /// collection must still order deterministically.
    pub fn compare(&self, other: &ViolationLocation) -> Ordering {
        use ViolationLocation::{Point, SourceSink};
        match (self, other) {
            (Point { file, line, column }, Point { file: f2, line: l2, column: c2 }) => file
                .cmp(f2)
                .then_with(|| cmp_optional(*line, *l2))
                .then_with(|| cmp_optional(*column, *c2)),
            (Point { .. }, SourceSink { .. }) => Ordering::Less,
            (SourceSink { .. }, Point { .. }) => Ordering::Greater,
            (
                SourceSink {
                    source_file,
                    source_line,
                    source_column,
                    sink_file,
                    sink_line,
                    sink_column,
                },
                SourceSink {
                    source_file: sf2,
                    source_line: sl2,
                    source_column: sc2,
                    sink_file: kf2,
                    sink_line: kl2,
                    sink_column: kc2,
                },
            ) => source_file
                .cmp(sf2)
                .then_with(|| cmp_optional(*source_line, *sl2))
                .then_with(|| cmp_optional(*source_column, *sc2))
                .then_with(|| sink_file.cmp(kf2))
                .then_with(|| cmp_optional(*sink_line, *kl2))
                .then_with(|| cmp_optional(*sink_column, *kc2)),
        }
    }
}

impl fmt::Display for ViolationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationLocation::Point { file, line, column } => {
                write_point(f, file, *line, *column)
            }
            ViolationLocation::SourceSink {
                source_file,
                source_line,
                source_column,
                sink_file,
                sink_line,
                sink_column,
            } => {
                write!(f, "Source: ")?;
                write_point(f, source_file, *source_line, *source_column)?;
                write!(f, "\nSink: ")?;
                write_point(f, sink_file, *sink_line, *sink_column)
            }
        }
    }
}

/// Renders `file[:line[:column]]` — the line segment is omitted when absent,
/// and the column only appears when the line is also present.
fn write_point(
    f: &mut fmt::Formatter<'_>,
    file: &str,
    line: Option<u64>,
    column: Option<u64>,
) -> fmt::Result {
    write!(f, "{file}")?;
    if let Some(line) = line {
        write!(f, ":{line}")?;
        if let Some(column) = column {
            write!(f, ":{column}")?;
        }
    }
    Ok(())
}

/// `None` sorts after any `Some` so that findings with position information
/// come first.
fn cmp_optional(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One finding from the external analysis tool.
///
/// `severity` is the tool's integer rank where a **smaller** number is more
/// severe (1 is worst; the domain is 1..=3 or 1..=5 depending on the tool
/// version). Immutable after parsing; owned by exactly one
/// [`Results`](crate::results::Results) collection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    pub severity: u8,
    pub engine: String,
    pub rule: String,
    pub url: Option<String>,
    pub message: String,
    pub location: ViolationLocation,
}

impl Violation {
    /// Total order used for display grouping: severity first (ascending, so
    /// most severe leads), then location, then engine, then rule name.
    /// `url` and `message` never participate.
    pub fn compare(&self, other: &Violation) -> Ordering {
        self.severity
            .cmp(&other.severity)
            .then_with(|| self.location.compare(&other.location))
            .then_with(|| self.engine.cmp(&other.engine))
            .then_with(|| self.rule.cmp(&other.rule))
    }
}
