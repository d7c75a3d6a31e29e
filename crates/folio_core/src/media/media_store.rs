//! Media store contract and local filesystem implementation.
//!
//! # Responsibility
//! - Save, list and delete per-project image directories.
//! - Enumerate slug directories for integrity checks and orphan sweeps.
//!
//! # Invariants
//! - `save` creates the slug directory non-recursively; an existing
//!   directory is a `Collision`, never a merge.
//! - `list` on an absent directory is empty, not an error.
//! - `delete` on an absent directory is a no-op so it is safe to retry.

use super::MediaFile;
use crate::model::project::{
    is_plain_component, Slug, ValidationError, ALLOWED_IMAGE_EXTENSIONS,
};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Slug directory already exists, typically another project's media.
    #[error("media folder `{0}` already exists")]
    Collision(Slug),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("media I/O failed at `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MediaError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Storage interface for per-project media directories.
pub trait MediaStore {
    /// Creates `<base>/<slug>/` and writes every file into it.
    ///
    /// Files sharing a name within one call overwrite each other in order.
    fn save(&self, slug: &Slug, files: &[MediaFile]) -> MediaResult<PathBuf>;
    /// Filenames inside the slug directory, sorted lexicographically.
    fn list(&self, slug: &Slug) -> MediaResult<Vec<String>>;
    /// Removes the slug directory recursively. Returns whether it existed.
    fn delete(&self, slug: &Slug) -> MediaResult<bool>;
    fn exists(&self, slug: &Slug) -> bool;
    /// Every slug directory present under the base directory, sorted.
    fn list_slugs(&self) -> MediaResult<Vec<Slug>>;
    /// Absolute (or base-relative) location of a slug directory.
    fn resolve(&self, slug: &Slug) -> PathBuf;
}

/// Media store rooted at one base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    base_dir: PathBuf,
}

impl FsMediaStore {
    /// Creates a store rooted at `base_dir`. The directory is created lazily
    /// on first `save`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl MediaStore for FsMediaStore {
    fn save(&self, slug: &Slug, files: &[MediaFile]) -> MediaResult<PathBuf> {
        for file in files {
            validate_file_name(&file.name)?;
        }

        fs::create_dir_all(&self.base_dir).map_err(|err| MediaError::io(&self.base_dir, err))?;

        let dir = self.resolve(slug);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                warn!("event=media_save module=media status=collision slug={slug}");
                return Err(MediaError::Collision(slug.clone()));
            }
            Err(err) => return Err(MediaError::io(&dir, err)),
        }

        for file in files {
            let path = dir.join(&file.name);
            if let Err(err) = fs::write(&path, &file.bytes) {
                // Leave no half-written directory behind to collide with a retry.
                if let Err(cleanup_err) = fs::remove_dir_all(&dir) {
                    warn!(
                        "event=media_save module=media status=cleanup_failed slug={} error={}",
                        slug, cleanup_err
                    );
                }
                return Err(MediaError::io(&path, err));
            }
        }

        info!(
            "event=media_save module=media status=ok slug={} file_count={}",
            slug,
            files.len()
        );
        Ok(dir)
    }

    fn list(&self, slug: &Slug) -> MediaResult<Vec<String>> {
        let dir = self.resolve(slug);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(MediaError::io(&dir, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| MediaError::io(&dir, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| MediaError::io(&entry.path(), err))?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(
                    "event=media_list module=media status=skipped slug={} reason=non_utf8_name name={:?}",
                    slug, raw
                ),
            }
        }

        names.sort();
        Ok(names)
    }

    fn delete(&self, slug: &Slug) -> MediaResult<bool> {
        let dir = self.resolve(slug);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!("event=media_delete module=media status=ok slug={slug}");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(MediaError::io(&dir, err)),
        }
    }

    fn exists(&self, slug: &Slug) -> bool {
        self.resolve(slug).is_dir()
    }

    fn list_slugs(&self) -> MediaResult<Vec<Slug>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(MediaError::io(&self.base_dir, err)),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| MediaError::io(&self.base_dir, err))?;
            let is_dir = entry
                .file_type()
                .map_err(|err| MediaError::io(&entry.path(), err))?
                .is_dir();
            if !is_dir {
                continue;
            }
            if let Some(slug) = entry.file_name().to_str().and_then(Slug::parse) {
                slugs.push(slug);
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    fn resolve(&self, slug: &Slug) -> PathBuf {
        self.base_dir.join(slug.as_str())
    }
}

/// Rejects names that would escape or alias the slug directory.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if !is_plain_component(name) {
        return Err(ValidationError::InvalidFileName(name.to_string()));
    }
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::UnsupportedImageType(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_file_name;
    use crate::model::project::ValidationError;

    #[test]
    fn file_names_must_be_single_components() {
        assert!(validate_file_name("cover.png").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("nested/cover.png").is_err());
        assert!(validate_file_name("..\\cover.png").is_err());
    }

    #[test]
    fn only_png_and_jpeg_uploads_are_accepted() {
        assert!(validate_file_name("Cover.PNG").is_ok());
        assert!(validate_file_name("shot.jpg").is_ok());
        assert!(validate_file_name("x.JPEG").is_ok());
        for name in ["payload.exe", "notes.txt", "png", "archive.png.zip"] {
            assert_eq!(
                validate_file_name(name),
                Err(ValidationError::UnsupportedImageType(name.to_string()))
            );
        }
    }
}
