//! Core persistence for the Folio project gallery.
//! This crate is the single source of truth for project/media invariants.

pub mod capability;
pub mod config;
pub mod db;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod service;

pub use capability::{AdminToken, CapabilityError};
pub use config::{ConfigError, GalleryConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use media::{FsMediaStore, MediaError, MediaFile, MediaStore};
pub use model::project::{
    NewProject, Project, ProjectId, Slug, ValidationError, MAX_IMAGES_PER_PROJECT,
};
pub use repo::project_repo::{
    ListOrder, ProjectRepository, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::gallery_service::{
    GalleryError, GalleryResult, GalleryService, ProjectDraft, ProjectView, RemovedProject,
    StorageError, SweepMode, SweepReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
