//! Command execution seam.
//!
//! Resolution code never spawns processes itself. It receives a
//! [`CommandExecutor`] and hands it a shell command string. Production code
//! passes a [`ShellExecutor`]; tests pass a closure returning canned output.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from running a command.
#[derive(Error, Debug)]
pub enum ExecError {
    /// Failed to spawn the shell.
    #[error("failed to run command: {0}")]
    Spawn(#[from] std::io::Error),

    /// The command exited with a non-zero status.
    #[error("command `{command}` failed: {stderr}")]
    Failed {
        /// The command line that was run.
        command: String,
        /// The exit code, if the process was not killed by a signal.
        exit_code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// Any other failure reported by an injected executor.
    #[error("{0}")]
    Other(String),
}

/// Result alias for command execution.
pub type ExecResult<T> = Result<T, ExecError>;

/// Runs a shell command synchronously and returns its captured stdout.
///
/// Implementations block until the command exits. A caller that needs a
/// timeout enforces it inside its own implementation.
pub trait CommandExecutor {
    /// Run `command` and return the bytes it wrote to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits unsuccessfully.
    fn execute(&self, command: &str) -> ExecResult<Vec<u8>>;
}

impl<F> CommandExecutor for F
where
    F: Fn(&str) -> ExecResult<Vec<u8>>,
{
    fn execute(&self, command: &str) -> ExecResult<Vec<u8>> {
        self(command)
    }
}

/// Executes commands through the platform shell (`sh -c`, or `cmd /C` on Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    working_dir: Option<Utf8PathBuf>,
}

impl ShellExecutor {
    /// Create an executor that runs in the current directory.
    pub const fn new() -> Self {
        Self { working_dir: None }
    }

    /// Run commands in `dir` instead of the current directory.
    pub fn in_dir<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl CommandExecutor for ShellExecutor {
    #[instrument(skip(self), fields(dir = ?self.working_dir))]
    fn execute(&self, command: &str) -> ExecResult<Vec<u8>> {
        let mut cmd = Self::shell(command);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;
        debug!(status = ?output.status, bytes = output.stdout.len(), "command finished");

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ExecError::Failed {
                command: command.to_string(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
