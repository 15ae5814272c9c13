//! Configuration loading.
//!
//! The gate is tool-agnostic: which analyzer CLI to run, how to probe for
//! it, and what to call the internal results file all live in a TOML
//! config file (`analyzer-gate.toml` in the working directory by default).
//! Every field carries a sensible default so the file can be omitted
//! entirely.

use std::path::Path;

/// Main configuration for the gate.
///
/// # Examples
///
/// ```rust,no_run
/// use analyzer_gate::config::Config;
///
/// // Load from the default location or fall back to built-in defaults.
/// let config = Config::load(None).unwrap();
/// assert!(!config.analyzer.command.is_empty());
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// The external analyzer CLI and how to talk to it.
    pub analyzer: AnalyzerConfig,
}

/// External analyzer settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Base command line the raw run arguments are appended to.
    pub command: String,
    /// Command whose exit code answers "is the CLI installed?".
    pub version_command: String,
    /// Command that prints plugin metadata as JSON for the minimum-version
    /// check (`[{ "name": ..., "version": ... }]`).
    pub probe_command: String,
    /// Plugin name the probe output must report.
    pub plugin_name: String,
    /// Minimum acceptable plugin version (semver). Empty disables the check.
    pub min_version: String,
    /// Results file appended to the run arguments when the user supplied no
    /// JSON output file of their own.
    pub default_results_file: String,
    /// Extra environment variables for the analyzer subprocess. The ambient
    /// process environment wins on conflicts.
    pub env: std::collections::HashMap<String, String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            command: "sf code-analyzer run".to_string(),
            version_command: "sf --version".to_string(),
            probe_command: "sf plugins inspect code-analyzer --json".to_string(),
            plugin_name: "code-analyzer".to_string(),
            min_version: "5.0.0-beta.0".to_string(),
            default_results_file: "analyzer_results.json".to_string(),
            env: std::collections::HashMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `analyzer-gate.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the
    /// file cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("analyzer-gate.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
            }
            None => Ok(Config::default()),
        }
    }
}
