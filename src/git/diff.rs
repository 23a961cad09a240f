//! Staged diff collection from the git backend.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GitError;

use super::command::{check_git_installed, run_git};

/// Diff flags: zero context, no color, whitespace and blank-line insensitive.
const DIFF_FLAGS: &[&str] = &[
    "diff",
    "--cached",
    "-U0",
    "--no-color",
    "--ignore-all-space",
    "--ignore-blank-lines",
];

/// A path pattern kept out of the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathExclusion {
    /// Any file whose path ends with the given suffix.
    Suffix(&'static str),
    /// Everything below a top-level directory.
    Directory(&'static str),
}

/// Lock files, dependency directories and build output.
///
/// Passed to git as `:(exclude)` pathspecs and re-checked by the normalizer.
pub const EXCLUDED_PATHS: &[PathExclusion] = &[
    PathExclusion::Suffix(".lock"),
    PathExclusion::Suffix("package-lock.json"),
    PathExclusion::Suffix("yarn.lock"),
    PathExclusion::Directory("node_modules"),
    PathExclusion::Directory("dist"),
    PathExclusion::Directory("build"),
];

impl PathExclusion {
    /// Render as a git exclude pathspec.
    pub fn pathspec(&self) -> String {
        match self {
            PathExclusion::Suffix(suffix) => format!(":(exclude)*{suffix}"),
            PathExclusion::Directory(dir) => format!(":(exclude){dir}/"),
        }
    }

    /// Whether a repository-relative path falls under this exclusion.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathExclusion::Suffix(suffix) => path.ends_with(suffix),
            PathExclusion::Directory(dir) => path
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/')),
        }
    }
}

/// Whether any of [`EXCLUDED_PATHS`] matches `path`.
pub fn is_excluded_path(path: &str) -> bool {
    EXCLUDED_PATHS.iter().any(|rule| rule.matches(path))
}

/// Raw `git diff` output, never mutated after collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDiff {
    bytes: Vec<u8>,
}

impl RawDiff {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lossy text view, for display only.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl From<&str> for RawDiff {
    fn from(text: &str) -> Self {
        RawDiff::from_bytes(text.as_bytes())
    }
}

/// Full argument list for the staged diff invocation.
pub fn staged_diff_args() -> Vec<String> {
    let mut args: Vec<String> = DIFF_FLAGS.iter().map(|s| s.to_string()).collect();
    args.push("--".to_string());
    args.extend(EXCLUDED_PATHS.iter().map(PathExclusion::pathspec));
    args
}

/// Collect the staged diff in `workdir` (or the current directory).
///
/// An empty result is not an error: callers decide what "nothing staged" means.
pub fn collect_staged_diff(workdir: Option<&Path>) -> Result<RawDiff, GitError> {
    check_git_installed()?;

    let args = staged_diff_args();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let stdout = run_git(workdir, &arg_refs, "diff")?;

    debug!(bytes = stdout.len(), "collected staged diff");
    Ok(RawDiff::from_bytes(stdout))
}

/// Source of the raw diff for a commit flow.
pub trait DiffSource {
    fn collect(&self) -> Result<RawDiff, GitError>;
}

/// Default source that runs `git diff --cached`.
#[derive(Debug, Clone, Default)]
pub struct GitDiffSource {
    workdir: Option<PathBuf>,
}

impl GitDiffSource {
    /// Collect from the process's current directory.
    pub fn current_dir() -> Self {
        Self::default()
    }

    /// Collect from a specific working tree.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }
}

impl DiffSource for GitDiffSource {
    fn collect(&self) -> Result<RawDiff, GitError> {
        collect_staged_diff(self.workdir.as_deref())
    }
}
