//! # analyzer-gate
//!
//! CI gate around an external static-analysis CLI.
//!
//! `analyzer-gate` is a thin orchestration layer, not an analysis engine:
//! it shells out to an analyzer binary, collects the JSON report the
//! binary writes, classifies and orders the violations, and renders a
//! size-bounded Markdown summary for the CI job's human-facing output.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use analyzer_gate::{results::Results, summary};
//!
//! let results = Results::from_file(Path::new("analyzer_results.json"), None)
//!     .expect("results file must parse");
//! println!("{}", summary::create_summary_markdown(&results));
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`args`]** — quote-aware inspection of the free-form argument
//!    string the CI configuration supplies.
//! 2. **[`runner`]** — plan the invocation (ensuring a JSON results file
//!    exists), merge environments, and sequence the run.
//! 3. **[`exec`]** — the subprocess seam ([`exec::CommandRunner`]).
//! 4. **[`results`]** — parse the report (two shapes across tool versions)
//!    into [`violation::Violation`]s with a memoized severity-sorted view.
//! 5. **[`summary`]** — render the Markdown digest.
//!
//! Configuration ([`config`]) selects which analyzer CLI is wrapped; the
//! core never interprets the analyzer's rules, only its report.

pub mod args;
pub mod config;
pub mod exec;
pub mod results;
pub mod runner;
pub mod summary;
pub mod violation;
