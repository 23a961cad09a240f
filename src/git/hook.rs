//! `prepare-commit-msg` hook that pre-fills `git commit` with a diny message.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::GitError;

pub const HOOK_NAME: &str = "prepare-commit-msg";

/// Marks a hook file as ours so it can be updated in place.
const HOOK_MARKER: &str = "# installed by diny";

/// Result of installing the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledHook {
    pub path: PathBuf,
    /// A previous diny hook was overwritten.
    pub updated: bool,
}

/// Hook body that runs `diny message` and prepends its output to `$1`.
///
/// Only a plain `git commit` is filled: `-m`, `-F`, merges, squashes and
/// amends pass a source in `$2` and are left alone. Any diny failure leaves
/// the message file untouched so the commit proceeds as usual.
pub fn hook_script(executable: &Path) -> String {
    format!(
        r#"#!/bin/sh
{HOOK_MARKER}
[ -z "$2" ] || exit 0
message=$({exe} message 2>/dev/null) || exit 0
[ -n "$message" ] || exit 0
{{ printf '%s\n' "$message"; cat "$1"; }} > "$1.diny" && mv "$1.diny" "$1"
exit 0
"#,
        exe = shell_quote(&executable.display().to_string())
    )
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Hooks directory of the repository, honoring `core.hooksPath`.
pub fn hooks_dir(repo: &Repository) -> PathBuf {
    let configured = repo
        .config()
        .and_then(|c| c.get_path("core.hooksPath"))
        .ok();
    match configured {
        Some(path) if path.is_absolute() => path,
        Some(path) => repo.workdir().unwrap_or(repo.path()).join(path),
        None => repo.path().join("hooks"),
    }
}

/// Install the hook into the repository containing `start`.
///
/// An existing hook written by diny is replaced; any other hook is kept and
/// reported as [`GitError::ForeignHook`].
pub fn install_hook(start: &Path, executable: &Path) -> Result<InstalledHook, GitError> {
    let repo = Repository::discover(start).map_err(GitError::NotARepository)?;
    let dir = hooks_dir(&repo);
    let path = dir.join(HOOK_NAME);

    let updated = match std::fs::read_to_string(&path) {
        Ok(existing) if existing.contains(HOOK_MARKER) => true,
        Ok(_) => return Err(GitError::ForeignHook { path }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(source) => return Err(GitError::HookWriteFailed { path, source }),
    };

    let write_failed = |source| GitError::HookWriteFailed {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(&dir).map_err(write_failed)?;
    std::fs::write(&path, hook_script(executable)).map_err(write_failed)?;
    make_executable(&path).map_err(write_failed)?;

    debug!(path = %path.display(), updated, "installed git hook");
    Ok(InstalledHook { path, updated })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_script_skips_explicit_messages() {
        let script = hook_script(Path::new("/usr/local/bin/diny"));
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains(r#"[ -z "$2" ] || exit 0"#));
        assert!(script.contains("'/usr/local/bin/diny' message"));
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("/opt/it's/diny"), r"'/opt/it'\''s/diny'");
    }
}
