//! Gallery configuration loading.
//!
//! # Responsibility
//! - Describe where project rows and media files live.
//! - Parse `folio.toml` and resolve relative paths against its directory.
//!
//! # Invariants
//! - Missing keys fall back to defaults; unknown keys are rejected.
//! - After `load`, every configured path is absolute or anchored at the
//!   config file's directory.

use crate::logging::default_log_level;
use crate::media::FsMediaStore;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_MEDIA_DIR: &str = "portfolio_data";
const DEFAULT_DB_PATH: &str = "portfolio.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to create media directory `{}`: {source}", path.display())]
    MediaDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Storage locations and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Base directory holding one folder per project.
    pub media_dir: PathBuf,
    /// SQLite database file.
    pub db_path: PathBuf,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Rolling log directory. File logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl GalleryConfig {
    /// Parses TOML text without touching the filesystem.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file, anchoring relative paths at its parent
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    /// Returns a copy with every relative path joined onto `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.media_dir = anchor(base, self.media_dir);
        self.db_path = anchor(base, self.db_path);
        self.logging.dir = self.logging.dir.map(|dir| anchor(base, dir));
        self
    }

    /// Creates the media base directory if it does not exist yet.
    pub fn ensure_media_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.media_dir).map_err(|source| ConfigError::MediaDir {
            path: self.media_dir.clone(),
            source,
        })
    }

    pub fn media_store(&self) -> FsMediaStore {
        FsMediaStore::new(self.media_dir.clone())
    }
}

fn anchor(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
