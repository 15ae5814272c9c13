//! Subprocess execution seam.
//!
//! Everything that shells out goes through the [`CommandRunner`] trait so
//! the orchestration in [`runner`](crate::runner) can be exercised with
//! fakes. The real implementation, [`ProcessRunner`], spawns via
//! [`std::process::Command`] with captured output.

use std::collections::HashMap;

/// Captured outcome of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Executes external commands.
///
/// `command` is a full command line (program plus arguments as one string);
/// `env` is added on top of the inherited environment. Implementations
/// return `Err` only when the process cannot be spawned or waited on — a
/// nonzero exit is a normal `Ok` outcome.
pub trait CommandRunner {
    fn exec(&self, command: &str, env: &HashMap<String, String>) -> Result<CommandOutput, String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
///
/// The command line is split into argv tokens with the same quote-aware
/// tokenizer used for argument inspection, so quoted paths with spaces
/// survive.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn exec(&self, command: &str, env: &HashMap<String, String>) -> Result<CommandOutput, String> {
        let argv = crate::args::split_command_line(command);
        let Some((program, args)) = argv.split_first() else {
            return Err("cannot execute an empty command".to_string());
        };

        let output = std::process::Command::new(program)
            .args(args)
            .envs(env)
            .output()
            .map_err(|e| format!("failed to run {program}: {e}"))?;

        Ok(CommandOutput {
            // A killed process has no code; 127 matches the shell's
            // command-not-found convention and is distinguishable from
            // every exit the analyzer itself produces.
            exit_code: output.status.code().unwrap_or(127),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
