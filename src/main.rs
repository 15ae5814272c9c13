mod cli;

use analyzer_gate::exec::ProcessRunner;
use analyzer_gate::results::{ReportFormat, Results};
use analyzer_gate::{config, runner, summary};
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            args,
            format,
            summary_file,
            config: config_path,
        } => {
            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("{} {e}", "Error:".red().bold());
                std::process::exit(2);
            });

            // Snapshot the ambient environment once; the orchestration only
            // sees this map, never the process environment itself.
            let ambient_env: HashMap<String, String> = std::env::vars().collect();

            eprintln!("{}", "Running analyzer".bold());
            let outcome =
                runner::run_analyzer(&ProcessRunner, &config, &args, format, &ambient_env)
                    .unwrap_or_else(|e| {
                        eprintln!("{} {e}", "Error:".red().bold());
                        std::process::exit(2);
                    });

            eprintln!(
                "  analyzer exit code: {}",
                outcome.exit_code.to_string().bold()
            );
            eprintln!("  results file: {}", outcome.plan.results_file);
            eprint_counts(&outcome.results);

            write_or_print(summary_file.as_deref(), &outcome.summary);
            std::process::exit(outcome.exit_code);
        }

        Commands::Summarize {
            results,
            format,
            output,
        } => {
            let results = load_results(&results, format);
            let markdown = summary::create_summary_markdown(&results);
            write_or_print(output.as_deref(), &markdown);
        }

        Commands::Counts { results, format } => {
            let results = load_results(&results, format);
            let counts = SeverityCounts {
                total: results.total_count(),
                sev1: results.count_for_severity(1),
                sev2: results.count_for_severity(2),
                sev3: results.count_for_severity(3),
                sev4: results.count_for_severity(4),
                sev5: results.count_for_severity(5),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&counts).expect("counts serialization failed")
            );
        }
    }
}

#[derive(serde::Serialize)]
struct SeverityCounts {
    total: usize,
    sev1: usize,
    sev2: usize,
    sev3: usize,
    sev4: usize,
    sev5: usize,
}

fn load_results(path: &Path, format: Option<ReportFormat>) -> Results {
    Results::from_file(path, format).unwrap_or_else(|e| {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(2);
    })
}

fn eprint_counts(results: &Results) {
    eprintln!("  violations: {}", results.total_count().to_string().bold());
    eprintln!(
        "    sev1: {}  sev2: {}  sev3: {}  sev4: {}  sev5: {}",
        results.count_for_severity(1).to_string().red(),
        results.count_for_severity(2),
        results.count_for_severity(3),
        results.count_for_severity(4),
        results.count_for_severity(5),
    );
}

fn write_or_print(path: Option<&Path>, content: &str) {
    match path {
        Some(path) => {
            std::fs::write(path, content).unwrap_or_else(|e| {
                eprintln!("{} writing {}: {e}", "Error:".red().bold(), path.display());
                std::process::exit(2);
            });
            eprintln!("Summary written to {}", path.display());
        }
        None => print!("{content}"),
    }
}
