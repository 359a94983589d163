//! Git environment probes.
//!
//! Used by diagnostics to explain why the first commit year might come back
//! as `0`: no `git` on `PATH`, not inside a work tree, or a shallow clone
//! whose root commit is not the real first commit.

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "rev-parse").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Locate the `git` binary on `PATH`.
pub fn git_binary() -> Option<PathBuf> {
    which::which("git").ok()
}

/// Check if we're inside a git work tree.
#[instrument]
pub fn is_inside_repo() -> GitResult<bool> {
    match git(&["rev-parse", "--is-inside-work-tree"]) {
        Ok(output) => Ok(output.trim() == "true"),
        Err(GitError::Command { .. } | GitError::NotARepo) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check whether the repository is a shallow clone.
///
/// In a shallow clone the oldest reachable commit is not the real root, so
/// the discovered year is the year of the clone's horizon.
#[instrument]
pub fn is_shallow() -> GitResult<bool> {
    let output = git(&["rev-parse", "--is-shallow-repository"])?;
    let shallow = output.trim() == "true";
    debug!(shallow, "shallow clone check");
    Ok(shallow)
}

/// Run a git command and return its stdout.
fn git(args: &[&str]) -> GitResult<String> {
    let output = Command::new("git").args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }

        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}
