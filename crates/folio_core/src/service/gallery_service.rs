//! Gallery persistence façade.
//!
//! # Responsibility
//! - Be the only entry point that creates or destroys projects.
//! - Keep the metadata row and the media directory consistent.
//! - Compose read models (`ProjectView`) for rendering.
//!
//! # Invariants
//! - `publish` validates everything before the first write, then writes media
//!   before metadata. A failed media write never leaves a row behind.
//! - `remove` deletes metadata before media. A crash in between leaves an
//!   orphan directory that `sweep_orphans` can reclaim.
//! - Row present but referenced directory absent is reported as
//!   `media_missing`, never raised as an error.
//!
//! # Concurrency
//! - Single writer. Callers sharing one service across threads must wrap it
//!   in a mutex themselves.

use crate::capability::AdminToken;
use crate::media::{validate_file_name, MediaError, MediaFile, MediaStore};
use crate::model::project::{
    validate_title, NewProject, Project, ProjectId, Slug, ValidationError, MAX_IMAGES_PER_PROJECT,
};
use crate::repo::project_repo::{ListOrder, ProjectRepository, RepoError};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use thiserror::Error;

pub type GalleryResult<T> = Result<T, GalleryError>;

/// Façade error taxonomy.
///
/// `Validation` and `Collision` are fixed by changing the input. `Storage` is
/// an infrastructure failure surfaced as-is; retrying is the caller's call.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    #[error("media folder `{0}` is already used by another project")]
    Collision(Slug),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Underlying table or filesystem failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("project store failed: {0}")]
    Repo(#[source] RepoError),
    #[error("media store failed: {0}")]
    Media(#[source] MediaError),
}

impl GalleryError {
    /// Stable short code for logs and machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Collision(_) => "collision",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<RepoError> for GalleryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(StorageError::Repo(other)),
        }
    }
}

impl From<MediaError> for GalleryError {
    fn from(value: MediaError) -> Self {
        match value {
            MediaError::Collision(slug) => Self::Collision(slug),
            MediaError::Validation(err) => Self::Validation(err),
            other => Self::Storage(StorageError::Media(other)),
        }
    }
}

/// Publish request assembled by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub subtitle: Option<String>,
    /// Trusted HTML from the rich-text editor.
    pub description: Option<String>,
    pub link: Option<String>,
    pub files: Vec<MediaFile>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Render-ready project with its ordered image filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub project: Project,
    /// Filenames sorted lexicographically.
    pub images: Vec<String>,
    /// Row references a media folder that is absent on disk.
    pub media_missing: bool,
}

/// Outcome of `remove`, used by callers to decide whether to refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedProject {
    pub project: Project,
    /// Whether a media directory was actually deleted.
    pub media_removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Report orphans only.
    DryRun,
    /// Report and delete orphans.
    Delete,
}

/// Media directories with no referencing project row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub orphans: Vec<Slug>,
    pub removed: Vec<Slug>,
}

/// Persistence façade over a project store and a media store.
pub struct GalleryService<R: ProjectRepository, M: MediaStore> {
    repo: R,
    media: M,
}

impl<R: ProjectRepository, M: MediaStore> GalleryService<R, M> {
    pub fn new(repo: R, media: M) -> Self {
        Self { repo, media }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Validates and stores a new project with its images.
    ///
    /// # Errors
    /// - `Validation` for a blank title, more than ten files, an unusable
    ///   filename, a non png/jpg/jpeg upload or an unusable slug. Nothing is
    ///   written.
    /// - `Collision` when the slug directory already exists. No row is written.
    /// - `Storage` when the table or filesystem fails.
    pub fn publish(&self, token: &AdminToken, draft: ProjectDraft) -> GalleryResult<ProjectId> {
        let started_at = Instant::now();
        let file_count = draft.files.len();

        match self.publish_inner(draft) {
            Ok((id, folder)) => {
                info!(
                    "event=project_publish module=service status=ok project_id={} folder={} file_count={} operator={} duration_ms={}",
                    id,
                    folder.as_ref().map_or("-", Slug::as_str),
                    file_count,
                    token.operator(),
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                log_failure("project_publish", &err, token, started_at);
                Err(err)
            }
        }
    }

    fn publish_inner(&self, draft: ProjectDraft) -> GalleryResult<(ProjectId, Option<Slug>)> {
        validate_title(&draft.title)?;
        if draft.files.len() > MAX_IMAGES_PER_PROJECT {
            return Err(ValidationError::TooManyFiles {
                count: draft.files.len(),
                max: MAX_IMAGES_PER_PROJECT,
            }
            .into());
        }
        for file in &draft.files {
            validate_file_name(&file.name)?;
        }
        let slug = Slug::from_title(&draft.title)?;

        let folder = if draft.files.is_empty() {
            None
        } else {
            self.media.save(&slug, &draft.files)?;
            Some(slug)
        };

        let record = NewProject {
            title: draft.title,
            subtitle: draft.subtitle,
            description: draft.description,
            link: draft.link,
            folder,
        };

        match self.repo.create(&record) {
            Ok(id) => Ok((id, record.folder)),
            Err(err) => {
                if let Some(slug) = &record.folder {
                    self.discard_media(slug);
                }
                Err(err.into())
            }
        }
    }

    /// Deletes a project row, then its media directory.
    ///
    /// A second call with the same id fails with `NotFound`.
    pub fn remove(&self, token: &AdminToken, id: ProjectId) -> GalleryResult<RemovedProject> {
        let started_at = Instant::now();

        match self.remove_inner(id) {
            Ok(removed) => {
                info!(
                    "event=project_remove module=service status=ok project_id={} media_removed={} operator={} duration_ms={}",
                    id,
                    removed.media_removed,
                    token.operator(),
                    started_at.elapsed().as_millis()
                );
                Ok(removed)
            }
            Err(err) => {
                log_failure("project_remove", &err, token, started_at);
                Err(err)
            }
        }
    }

    fn remove_inner(&self, id: ProjectId) -> GalleryResult<RemovedProject> {
        let project = self.repo.get(id)?;
        self.repo.delete(id)?;

        let media_removed = match &project.folder {
            Some(slug) => {
                // Rows written before collisions were rejected can share a folder.
                if self.repo.folder_in_use(slug)? {
                    warn!(
                        "event=project_remove module=service status=media_shared project_id={id} folder={slug}"
                    );
                    false
                } else {
                    self.media.delete(slug)?
                }
            }
            None => false,
        };

        Ok(RemovedProject {
            project,
            media_removed,
        })
    }

    /// Returns one project with its ordered image filenames.
    pub fn view(&self, id: ProjectId) -> GalleryResult<ProjectView> {
        let project = self.repo.get(id)?;
        let view = self.compose_view(project)?;
        debug!(
            "event=project_view module=service status=ok project_id={} image_count={} media_missing={}",
            id,
            view.images.len(),
            view.media_missing
        );
        Ok(view)
    }

    /// Returns every project, newest first, each with its ordered images.
    pub fn view_all(&self) -> GalleryResult<Vec<ProjectView>> {
        let started_at = Instant::now();
        let views = self
            .repo
            .list_all(ListOrder::NewestFirst)?
            .into_iter()
            .map(|project| self.compose_view(project))
            .collect::<GalleryResult<Vec<_>>>()?;
        debug!(
            "event=project_view_all module=service status=ok count={} duration_ms={}",
            views.len(),
            started_at.elapsed().as_millis()
        );
        Ok(views)
    }

    /// Finds media directories no project row references.
    ///
    /// These are left behind by a crash between the media write and the row
    /// insert, or between the row delete and the media delete.
    pub fn sweep_orphans(&self, token: &AdminToken, mode: SweepMode) -> GalleryResult<SweepReport> {
        let referenced: BTreeSet<Slug> = self.repo.list_folders()?.into_iter().collect();
        let mut report = SweepReport::default();

        for slug in self.media.list_slugs()? {
            if referenced.contains(&slug) {
                continue;
            }
            if mode == SweepMode::Delete && self.media.delete(&slug)? {
                report.removed.push(slug.clone());
            }
            report.orphans.push(slug);
        }

        info!(
            "event=media_sweep module=service status=ok mode={:?} orphan_count={} removed_count={} operator={}",
            mode,
            report.orphans.len(),
            report.removed.len(),
            token.operator()
        );
        Ok(report)
    }

    /// Ids of projects whose referenced media folder is missing on disk.
    pub fn integrity_report(&self) -> GalleryResult<Vec<ProjectId>> {
        let projects = self.repo.list_all(ListOrder::OldestFirst)?;
        let checked = projects.len();
        let missing: Vec<ProjectId> = projects
            .into_iter()
            .filter(|project| {
                project
                    .folder
                    .as_ref()
                    .is_some_and(|slug| !self.media.exists(slug))
            })
            .map(|project| project.id)
            .collect();
        debug!(
            "event=integrity_report module=service status=ok checked_count={} missing_count={}",
            checked,
            missing.len()
        );
        Ok(missing)
    }

    fn compose_view(&self, project: Project) -> GalleryResult<ProjectView> {
        let (images, media_missing) = match &project.folder {
            Some(slug) if !self.media.exists(slug) => {
                warn!(
                    "event=project_view module=service status=media_missing project_id={} folder={}",
                    project.id, slug
                );
                (Vec::new(), true)
            }
            Some(slug) => (self.media.list(slug)?, false),
            None => (Vec::new(), false),
        };

        Ok(ProjectView {
            project,
            images,
            media_missing,
        })
    }

    fn discard_media(&self, slug: &Slug) {
        if let Err(err) = self.media.delete(slug) {
            error!(
                "event=project_publish module=service status=rollback_failed folder={slug} error={err}"
            );
        }
    }
}

fn log_failure(event: &str, err: &GalleryError, token: &AdminToken, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        GalleryError::Storage(_) => error!(
            "event={} module=service status=error error_code={} operator={} duration_ms={} error={}",
            event,
            err.code(),
            token.operator(),
            duration_ms,
            err
        ),
        _ => warn!(
            "event={} module=service status=rejected error_code={} operator={} duration_ms={}",
            event,
            err.code(),
            token.operator(),
            duration_ms
        ),
    }
}
