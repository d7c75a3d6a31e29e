//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record and its identity type.
//! - Derive filesystem-safe slugs from project titles.
//! - Classify bad caller input into `ValidationError` variants.
//!
//! # Invariants
//! - `ProjectId` values are positive and never reused by the store.
//! - A `Slug` is always a single plain path component (no separators, not
//!   `.` or `..`, not empty).
//! - `title` must contain at least one non-whitespace character.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const SLUG_SEPARATOR: &str = "_";
// Common NAME_MAX for ext4, APFS and NTFS.
const MAX_SLUG_BYTES: usize = 255;

/// Upload extensions accepted as project images, compared case-insensitively.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Maximum number of images a single project may carry.
pub const MAX_IMAGES_PER_PROJECT: usize = 10;

/// Caller input that cannot be accepted.
///
/// Every variant is recoverable by fixing the input and retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title is empty or whitespace-only.
    #[error("project title is required")]
    MissingTitle,
    /// More images than a project may hold.
    #[error("too many images: {count} (max {max})")]
    TooManyFiles { count: usize, max: usize },
    /// Title normalizes to a slug that cannot name a directory.
    #[error("title `{0}` does not produce a usable folder name")]
    InvalidSlug(String),
    /// Uploaded filename is not a single plain path component.
    #[error("invalid image file name: `{0}`")]
    InvalidFileName(String),
    /// Upload is not a png/jpg/jpeg image.
    #[error("unsupported image type: `{0}` (expected png, jpg or jpeg)")]
    UnsupportedImageType(String),
    /// Identity text is not a positive integer.
    #[error("invalid project id: `{0}`")]
    InvalidId(String),
}

/// Store-assigned project identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    /// Wraps a raw row id. Returns `None` for non-positive values.
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ValidationError::InvalidId(value.to_string()))
    }
}

/// Normalized, filesystem-safe media folder name derived from a title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derives a slug from a project title.
    ///
    /// Trims, lowercases, collapses whitespace runs into `_` and replaces path
    /// separators with `_`. Two titles differing only in case or spacing map
    /// to the same slug.
    ///
    /// # Errors
    /// - `MissingTitle` when the title is blank.
    /// - `InvalidSlug` when the result is `.` or `..`, longer than a folder
    ///   name may be, or otherwise unsafe.
    pub fn from_title(title: &str) -> Result<Self, ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let lowered = trimmed.to_lowercase();
        let collapsed = WHITESPACE_RE.replace_all(&lowered, SLUG_SEPARATOR);
        let slug = collapsed.replace(['/', '\\'], SLUG_SEPARATOR);

        if slug.len() > MAX_SLUG_BYTES {
            return Err(ValidationError::InvalidSlug(title.to_string()));
        }
        Self::parse(&slug).ok_or_else(|| ValidationError::InvalidSlug(title.to_string()))
    }

    /// Accepts an already-normalized folder name, e.g. one read back from the
    /// store or enumerated from the media directory.
    pub fn parse(value: &str) -> Option<Self> {
        is_plain_component(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical project record as persisted in the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    /// Human-readable name, stored verbatim.
    pub title: String,
    /// Free-form role/category label.
    pub subtitle: Option<String>,
    /// Trusted HTML body. Renderers must not re-escape it.
    pub description: Option<String>,
    /// External link, stored and displayed verbatim.
    pub link: Option<String>,
    /// Media folder relative to the configured base directory. `None` when the
    /// project was published without images.
    pub folder: Option<Slug>,
}

/// Insert payload for the project store; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProject {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub folder: Option<Slug>,
}

impl NewProject {
    /// Checks the invariants the store enforces before writing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(())
}

/// Returns whether `value` can be used as exactly one path component.
pub(crate) fn is_plain_component(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0'])
}
