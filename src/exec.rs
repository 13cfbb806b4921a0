//! External command execution.
//!
//! Two call styles are offered and each call site picks one explicitly:
//!
//! - **checked**: [`Executor::run`] returns a [`CommandError`] on spawn
//!   failure or non-zero exit, to be propagated with `?`;
//! - **advisory**: [`capture`] / [`capture_lines`] log the failure through the
//!   diagnostic logger and hand back whatever output there was.
use std::fmt::Debug;
use std::process::{Command, Output};

use crate::error::CommandError;
use crate::logging::Logger;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Standard output followed by standard error.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
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

/// Abstraction over process execution so handlers can be tested without
/// touching the live system.
pub trait Executor: Debug {
    /// Run a command, failing on spawn error or non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot be started and
    /// [`CommandError::Failed`] if it exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError>;

    /// Run a command and return its result regardless of exit status.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            return Err(CommandError::Failed {
                program: program.to_string(),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
                stdout: result.stdout,
            });
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Run a command in advisory mode and return its combined output.
///
/// Failures are logged as `ERROR :: <program> :: <reason>` and never
/// propagate; the caller continues with the partial (usually empty) output.
pub fn capture(executor: &dyn Executor, log: &Logger, program: &str, args: &[&str]) -> String {
    match executor.run(program, args) {
        Ok(result) => result.combined(),
        Err(e) => {
            log.error_columns(&[program, &e.to_string()]);
            match e {
                CommandError::Failed { stdout, .. } => stdout,
                CommandError::Spawn { .. } => String::new(),
            }
        }
    }
}

/// Line-oriented form of [`capture`]; blank lines are dropped.
pub fn capture_lines(
    executor: &dyn Executor,
    log: &Logger,
    program: &str,
    args: &[&str],
) -> Vec<String> {
    capture(executor, log, program, args)
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(String::from)
        .collect()
}
