//! Commit invocation.

use std::path::{Path, PathBuf};

use crate::error::GitError;

use super::command::run_git;

/// Create a commit from the staged changes with `message`.
///
/// Non-interactive and hook-bypassing (`--no-verify`); the message is passed
/// verbatim as a single `-m` argument.
pub fn commit_with_message(workdir: Option<&Path>, message: &str) -> Result<(), GitError> {
    run_git(workdir, &["commit", "--no-verify", "-m", message], "commit")?;
    Ok(())
}

/// Applies an accepted commit message.
#[cfg_attr(test, mockall::automock)]
pub trait CommitInvoker {
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// Default invoker that runs `git commit`.
#[derive(Debug, Clone, Default)]
pub struct GitCommitter {
    workdir: Option<PathBuf>,
}

impl GitCommitter {
    pub fn current_dir() -> Self {
        Self::default()
    }

    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }
}

impl CommitInvoker for GitCommitter {
    fn commit(&self, message: &str) -> Result<(), GitError> {
        commit_with_message(self.workdir.as_deref(), message)
    }
}
