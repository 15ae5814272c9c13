use analyzer_gate::results::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "analyzer-gate",
    version,
    about = "CI gate for external static-analysis tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the analyzer, summarize its results, and pass its exit code through
    Run {
        /// Raw argument string forwarded to the analyzer
        #[arg(default_value = "")]
        args: String,

        /// Report shape hint (auto-detected from the JSON root when omitted;
        /// data-flow reports must be stated explicitly)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Write the Markdown summary to a file instead of stdout
        #[arg(long, short)]
        summary_file: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render the Markdown summary for an existing results file
    Summarize {
        /// Path to the analyzer's JSON results file
        results: PathBuf,

        /// Report shape hint (auto-detected when omitted)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print severity counts for an existing results file as JSON
    Counts {
        /// Path to the analyzer's JSON results file
        results: PathBuf,

        /// Report shape hint (auto-detected when omitted)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
}
