//! `folio publish` — create a project from local files.

use crate::context::{admin_token, AppContext};
use crate::output::{print_json, OutputMode};
use anyhow::Context;
use clap::Args;
use folio_core::{MediaFile, ProjectDraft};
use log::debug;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Project title; also names the media folder.
    #[arg(short, long)]
    pub title: String,

    /// Sub-title or role.
    #[arg(short, long)]
    pub subtitle: Option<String>,

    /// Description as inline HTML.
    #[arg(short, long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the HTML description from a file.
    #[arg(long)]
    pub description_file: Option<PathBuf>,

    /// Live URL shown with the project.
    #[arg(short, long)]
    pub link: Option<String>,

    /// png/jpg/jpeg image to upload (repeatable, at most 10).
    #[arg(short, long = "image")]
    pub images: Vec<PathBuf>,
}

pub fn run_publish(
    args: &PublishArgs,
    ctx: &AppContext,
    operator: &str,
    output: OutputMode,
) -> anyhow::Result<()> {
    let token = admin_token(operator)?;
    let draft = build_draft(args)?;

    let id = ctx.gallery().publish(&token, draft)?;

    if output == OutputMode::Json {
        print_json(&json!({ "id": id }))
    } else {
        println!("Published project #{id}: {}", args.title);
        Ok(())
    }
}

fn build_draft(args: &PublishArgs) -> anyhow::Result<ProjectDraft> {
    let description = match &args.description_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading description {}", path.display()))?,
        ),
        None => args.description.clone(),
    };

    let files = args
        .images
        .iter()
        .map(|path| read_image(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ProjectDraft {
        title: args.title.clone(),
        subtitle: args.subtitle.clone(),
        description,
        link: args.link.clone(),
        files,
    })
}

fn read_image(path: &Path) -> anyhow::Result<MediaFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("image path {} has no usable file name", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
    debug!(
        "event=cli_read_image module=cli status=ok name={} bytes={}",
        name,
        bytes.len()
    );
    Ok(MediaFile::new(name, bytes))
}
