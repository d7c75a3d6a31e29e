//! Filesystem media storage for project images.
//!
//! # Responsibility
//! - Map a project slug to one directory of uploaded image files.
//! - Keep directory layout `<base_dir>/<slug>/<original_filename>`.
//!
//! # Invariants
//! - Listings are sorted by filename so gallery output is reproducible.
//! - An existing slug directory is never merged into.

pub mod media_store;

pub use media_store::{validate_file_name, FsMediaStore, MediaError, MediaResult, MediaStore};

/// One decoded upload: original filename plus raw bytes.
///
/// The UI layer owns multipart decoding; this is what it hands to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}
