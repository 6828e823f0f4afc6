//! Shell command execution behind the [`ProcessRunner`] seam.
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs shell command lines on behalf of the engine.
///
/// Reload scripts, refresh commands and OS appearance commands all go through
/// this trait so tests can substitute a recording or mock runner.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner {
    /// Run `command` through the platform shell inside `cwd`.
    ///
    /// Returns the captured output whatever the exit status is.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shell process cannot be spawned.
    fn run_shell(&self, command: &str, cwd: &Path) -> Result<ExecResult>;
}

/// Production [`ProcessRunner`] using `sh -c` (`cmd /C` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run_shell(&self, command: &str, cwd: &Path) -> Result<ExecResult> {
        #[cfg(windows)]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };
        let output = cmd
            .current_dir(cwd)
            .output()
            .with_context(|| format!("failed to execute: {command}"))?;
        Ok(ExecResult::from(output))
    }
}

/// Quote a filesystem path so the shell treats it as a single word.
#[must_use]
pub fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    #[cfg(windows)]
    {
        format!("\"{raw}\"")
    }
    #[cfg(not(windows))]
    {
        format!("'{}'", raw.replace('\'', r"'\''"))
    }
}
