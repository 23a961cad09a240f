//! Git backend: staged diff collection, commit invocation, hooks and aliases.

pub mod alias;
pub mod command;
pub mod commit;
pub mod diff;
pub mod hook;
pub mod repo;

pub use alias::{AliasRemoval, install_alias, remove_alias, resolve_executable};
pub use command::{check_git_installed, run_git};
pub use commit::{CommitInvoker, GitCommitter, commit_with_message};
pub use diff::{
    DiffSource, EXCLUDED_PATHS, GitDiffSource, PathExclusion, RawDiff, collect_staged_diff,
    is_excluded_path, staged_diff_args,
};
pub use hook::{HOOK_NAME, InstalledHook, hook_script, hooks_dir, install_hook};
pub use repo::find_git_dir;
