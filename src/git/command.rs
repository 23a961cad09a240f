//! Thin wrapper over the system `git` binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};

use crate::error::GitError;

/// Check that a `git` executable is reachable.
pub fn check_git_installed() -> Result<PathBuf, GitError> {
    which::which("git").map_err(|_| GitError::NotInstalled)
}

/// Run git with `args`, returning stdout bytes on success.
///
/// `workdir` of `None` runs in the process's current directory.
pub fn run_git(workdir: Option<&Path>, args: &[&str], operation: &str) -> Result<Vec<u8>, GitError> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(dir) = workdir {
        command.current_dir(dir);
    }

    debug!(operation, "running git");
    trace!(?args);

    let output = command.output().map_err(|source| GitError::SpawnFailed {
        operation: operation.to_string(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::NonZeroExit {
            operation: operation.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(output.stdout)
}
