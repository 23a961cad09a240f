//! Persistence of [`StyleConfig`] inside the repository's git directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ConfigError;
use crate::git::find_git_dir;

use super::style::StyleConfig;

/// File name of the configuration inside `.git/`.
pub const CONFIG_FILE_NAME: &str = "diny-config.json";

/// Read/write access to the user's style preferences.
pub trait ConfigStore {
    /// Load preferences, falling back to defaults when none are saved.
    fn load(&self) -> Result<StyleConfig, ConfigError>;

    fn save(&self, style: &StyleConfig) -> Result<(), ConfigError>;
}

/// JSON file store, normally at `.git/diny-config.json`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for the repository containing `start`.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        let git_dir = find_git_dir(start)?;
        Ok(Self::new(git_dir.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<StyleConfig, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no configuration saved, using defaults");
                return Ok(StyleConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Write atomically: a temp file in the same directory, then rename.
    fn save(&self, style: &StyleConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_vec_pretty(style).map_err(ConfigError::SerializeFailed)?;
        let write_failed = |source| ConfigError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir).map_err(write_failed)?;
        file.write_all(&json).map_err(write_failed)?;
        file.write_all(b"\n").map_err(write_failed)?;
        file.persist(&self.path).map_err(|e| write_failed(e.error))?;

        debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}
