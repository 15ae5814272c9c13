//! Run orchestration.
//!
//! Sequences one analyzer invocation end to end: probe for the external
//! CLI, plan the run arguments so a JSON results file always exists, spawn
//! the analyzer, parse its results, and render the Markdown summary. The
//! planning and environment-merging pieces are pure functions; everything
//! that touches a subprocess goes through the
//! [`CommandRunner`](crate::exec::CommandRunner) seam.

use crate::args::RunArguments;
use crate::config::Config;
use crate::exec::{CommandOutput, CommandRunner};
use crate::results::{ReportFormat, Results};
use crate::summary;
use std::collections::HashMap;

/// The planned analyzer invocation.
#[derive(Debug, PartialEq, Eq)]
pub struct RunPlan {
    /// Final argument string handed to the analyzer (user arguments plus
    /// any appended output-file / view flags).
    pub run_args: String,
    /// The JSON results file the gate will read after the run.
    pub results_file: String,
    /// Output files the user asked for themselves, in order.
    pub user_output_files: Vec<String>,
}

/// Plans the analyzer invocation from the raw user argument string.
///
/// The gate needs a JSON results file to post-process. The first
/// user-supplied `--output-file`/`-f` value ending in `.json`
/// (case-insensitive) is used as-is. When there is none,
/// `--output-file <default_results_file>` is appended — and if the user
/// supplied no output files and no `--view`/`-v` either, `--view table` is
/// appended too, so adding our output file does not silently swallow the
/// console output they were getting before.
pub fn plan_run_arguments(raw_args: &str, default_results_file: &str) -> RunPlan {
    let args = RunArguments::new(raw_args);
    let user_output_files = args.values_for("--output-file", Some("-f"));
    let json_output_file = user_output_files
        .iter()
        .find(|f| f.to_lowercase().ends_with(".json"))
        .cloned();

    match json_output_file {
        Some(results_file) => RunPlan {
            run_args: raw_args.to_string(),
            results_file,
            user_output_files,
        },
        None => {
            let mut run_args = format!("{raw_args} --output-file {default_results_file}");
            if user_output_files.is_empty() && !args.contains_flag("--view", Some("-v")) {
                run_args.push_str(" --view table");
            }
            RunPlan {
                run_args,
                results_file: default_results_file.to_string(),
                user_output_files,
            }
        }
    }
}

/// Merges override variables with an ambient environment snapshot.
///
/// The ambient snapshot wins on conflicts: overrides only fill in variables
/// the environment does not already define. The snapshot is passed in
/// explicitly rather than read from the process so callers (and tests)
/// control exactly what the subprocess sees.
pub fn merge_env_vars(
    overrides: HashMap<String, String>,
    ambient: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = overrides;
    for (k, v) in ambient {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

#[derive(serde::Deserialize)]
struct PluginMetadata {
    name: String,
    version: String,
}

/// Tolerant minimum-version check over plugin-probe output.
///
/// Expects `probe_stdout` to be a JSON array with exactly one entry naming
/// `plugin_name`. Malformed JSON, an unexpected shape, a name mismatch, or
/// an unparseable version all yield `false` — a failed probe means "not
/// satisfied", never an error.
pub fn meets_min_version(probe_stdout: &str, plugin_name: &str, min_version: &str) -> bool {
    let Ok(min) = semver::Version::parse(min_version) else {
        return false;
    };
    let Ok(plugins) = serde_json::from_str::<Vec<PluginMetadata>>(probe_stdout) else {
        return false;
    };
    if plugins.len() != 1 || plugins[0].name != plugin_name {
        return false;
    }
    match semver::Version::parse(&plugins[0].version) {
        Ok(found) => found >= min,
        Err(_) => false,
    }
}

/// Everything the binary needs to report after one gated run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Exit code of the analyzer subprocess (passed through to the caller).
    pub exit_code: i32,
    /// Parsed violations from the results file.
    pub results: Results,
    /// Rendered Markdown summary.
    pub summary: String,
    /// The plan the run was executed against.
    pub plan: RunPlan,
}

/// Runs the analyzer end to end.
///
/// Steps, in order:
/// 1. Probe for the external CLI (`version_command`); a nonzero exit is a
///    fatal, human-readable failure.
/// 2. If a minimum plugin version is configured, probe for it; the check is
///    tolerant of malformed probe output but a shortfall is fatal.
/// 3. Plan the run arguments ([`plan_run_arguments`]).
/// 4. Spawn the analyzer with the merged environment.
/// 5. Verify the planned results file exists, then parse it (fatal on any
///    read/parse failure) and render the summary.
///
/// # Errors
///
/// Returns `Err(String)` with a human-readable message for every failure
/// mode above; the binary reports it and exits rather than continuing with
/// numbers that would be silently wrong.
pub fn run_analyzer(
    runner: &dyn CommandRunner,
    config: &Config,
    raw_args: &str,
    format: Option<ReportFormat>,
    ambient_env: &HashMap<String, String>,
) -> Result<RunOutcome, String> {
    let analyzer = &config.analyzer;

    let version_probe: CommandOutput = runner.exec(&analyzer.version_command, ambient_env)?;
    if version_probe.exit_code != 0 {
        return Err(format!(
            "The analyzer CLI was not found (`{}` exited with {}).\n\
             It must be installed in the environment before this gate runs.",
            analyzer.version_command, version_probe.exit_code
        ));
    }

    if !analyzer.min_version.is_empty() {
        let probe = runner.exec(&analyzer.probe_command, ambient_env)?;
        let satisfied = probe.exit_code == 0
            && meets_min_version(&probe.stdout, &analyzer.plugin_name, &analyzer.min_version);
        if !satisfied {
            return Err(format!(
                "The {} plugin of version {} or greater was not found.\n\
                 Install or upgrade it before this gate runs.",
                analyzer.plugin_name, analyzer.min_version
            ));
        }
    }

    let plan = plan_run_arguments(raw_args, &analyzer.default_results_file);
    let command = format!("{} {}", analyzer.command, plan.run_args);
    let env = merge_env_vars(analyzer.env.clone(), ambient_env);
    let output = runner.exec(&command, &env)?;

    for file in &plan.user_output_files {
        assert_file_exists(file)?;
    }
    assert_file_exists(&plan.results_file)?;

    let results = Results::from_file(std::path::Path::new(&plan.results_file), format)
        .map_err(|e| e.to_string())?;
    let summary = summary::create_summary_markdown(&results);

    Ok(RunOutcome {
        exit_code: output.exit_code,
        results,
        summary,
        plan,
    })
}

fn assert_file_exists(file: &str) -> Result<(), String> {
    if std::path::Path::new(file).exists() {
        Ok(())
    } else {
        Err(format!(
            "The file {file} was not found. Check the analyzer output for an error."
        ))
    }
}
