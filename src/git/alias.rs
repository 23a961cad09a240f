//! Global `git auto` alias management.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GitError;

use super::command::run_git;

/// Name of the alias key in git's global config.
const ALIAS_KEY: &str = "alias.auto";

/// `git config --unset` exit status when the key does not exist.
const UNSET_MISSING_KEY_STATUS: i32 = 5;

/// Result of removing the alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasRemoval {
    Removed,
    NotFound,
}

/// Shell alias body that runs `diny commit` via `executable`.
pub fn alias_command(executable: &Path) -> String {
    format!("!{} commit", executable.display())
}

/// Find the diny executable: PATH first, then the running binary.
pub fn resolve_executable() -> Result<PathBuf, GitError> {
    if let Ok(path) = which::which("diny") {
        return Ok(path);
    }

    let current = std::env::current_exe()
        .map_err(|e| GitError::ExecutableNotFound(e.to_string()))?;
    debug!(path = %current.display(), "diny not in PATH, using current executable");
    current
        .canonicalize()
        .map_err(|e| GitError::ExecutableNotFound(e.to_string()))
}

/// Install `git auto` as a global alias for `diny commit`.
pub fn install_alias(executable: &Path) -> Result<(), GitError> {
    let command = alias_command(executable);
    run_git(
        None,
        &["config", "--global", ALIAS_KEY, &command],
        "config alias",
    )?;
    Ok(())
}

/// Remove the global `git auto` alias.
pub fn remove_alias() -> Result<AliasRemoval, GitError> {
    match run_git(
        None,
        &["config", "--global", "--unset", ALIAS_KEY],
        "config unset alias",
    ) {
        Ok(_) => Ok(AliasRemoval::Removed),
        Err(GitError::NonZeroExit { code, .. }) if code == UNSET_MISSING_KEY_STATUS => {
            Ok(AliasRemoval::NotFound)
        }
        Err(e) => Err(e),
    }
}
