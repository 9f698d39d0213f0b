//! External process execution.

use std::path::Path;
use std::process::Command;

/// Captured result of one process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Whether the process started and exited with status zero.
    pub success: bool,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error, or the spawn error if the process never started.
    pub stderr: String,
}

impl ProcessOutput {
    /// Creates a successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Creates a failed output with the given stderr.
    #[must_use]
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs an argument vector and captures its output.
///
/// The first element of `command` is the program. Implementations block until
/// the process terminates.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` in `working_dir` (or the current directory).
    fn run(&self, command: &[String], working_dir: Option<&Path>) -> ProcessOutput;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &[String], working_dir: Option<&Path>) -> ProcessOutput {
        let Some((program, args)) = command.split_first() else {
            return ProcessOutput::failure("empty command");
        };

        tracing::debug!("Running command: {} {:?} in {:?}", program, args, working_dir);

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("failed to execute command '{}': {}", program, e);
                return ProcessOutput::failure(format!("failed to execute command '{program}': {e}"));
            }
        };

        let result = ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success {
            tracing::warn!(
                "Command '{}' exited with code {}: {}",
                program,
                output.status.code().unwrap_or(-1),
                result.stderr.trim_end()
            );
        }

        result
    }
}
