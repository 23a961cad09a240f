//! Repository discovery using git2.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::GitError;

/// Locate the `.git` directory of the repository containing `start`.
pub fn find_git_dir(start: &Path) -> Result<PathBuf, GitError> {
    let repo = Repository::discover(start).map_err(GitError::NotARepository)?;
    Ok(repo.path().to_path_buf())
}
