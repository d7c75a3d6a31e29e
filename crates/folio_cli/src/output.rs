//! Human and JSON rendering for command results.

use folio_core::ProjectView;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes one gallery card. `media_dir` turns image names into paths.
pub fn write_view(w: &mut dyn Write, view: &ProjectView, media_dir: &Path) -> io::Result<()> {
    let project = &view.project;
    writeln!(w, "#{} {}", project.id, project.title)?;
    if let Some(subtitle) = project.subtitle.as_deref().filter(|s| !s.is_empty()) {
        writeln!(w, "  {subtitle}")?;
    }
    if let Some(link) = project.link.as_deref().filter(|s| !s.is_empty()) {
        writeln!(w, "  link: {link}")?;
    }
    if let Some(description) = project.description.as_deref().filter(|s| !s.is_empty()) {
        // Trusted HTML; shown as stored.
        writeln!(w, "  description: {description}")?;
    }
    match &project.folder {
        Some(folder) if view.media_missing => {
            writeln!(w, "  images: folder `{folder}` is missing")?;
        }
        Some(folder) => {
            for image in &view.images {
                writeln!(w, "  image: {}", media_dir.join(folder.as_str()).join(image).display())?;
            }
        }
        None => writeln!(w, "  images: none")?,
    }
    Ok(())
}
