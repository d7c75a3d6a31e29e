//! Per-invocation wiring: config, logging, database and media store.

use anyhow::Context;
use folio_core::db::open_db;
use folio_core::{
    init_logging, AdminToken, FsMediaStore, GalleryConfig, GalleryService,
    SqliteProjectRepository,
};
use rusqlite::Connection;
use std::path::Path;

pub type Gallery<'conn> = GalleryService<SqliteProjectRepository<'conn>, FsMediaStore>;

pub struct AppContext {
    config: GalleryConfig,
    conn: Connection,
}

impl AppContext {
    /// Loads `config_path` (defaults when absent), starts file logging when
    /// configured, ensures the media directory and opens the database.
    pub fn open(config_path: &Path) -> anyhow::Result<Self> {
        let config = if config_path.exists() {
            GalleryConfig::load(config_path)
                .with_context(|| format!("loading config {}", config_path.display()))?
        } else {
            GalleryConfig::default()
        };
        let cwd = std::env::current_dir().context("resolving working directory")?;
        let config = config.relative_to(&cwd);

        if let Some(log_dir) = &config.logging.dir {
            init_logging(&config.logging.level, log_dir)?;
        }

        config.ensure_media_dir()?;
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
        let conn = open_db(&config.db_path)
            .with_context(|| format!("opening database {}", config.db_path.display()))?;

        Ok(Self { config, conn })
    }

    pub fn gallery(&self) -> Gallery<'_> {
        GalleryService::new(
            SqliteProjectRepository::new(&self.conn),
            self.config.media_store(),
        )
    }

    pub fn media_dir(&self) -> &Path {
        &self.config.media_dir
    }
}

/// Mints the write capability for the operator running this process.
pub fn admin_token(operator: &str) -> anyhow::Result<AdminToken> {
    AdminToken::issue(operator).context("invalid --operator")
}
