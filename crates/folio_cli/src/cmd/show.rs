//! `folio list` and `folio show` — gallery read paths.

use crate::context::AppContext;
use crate::output::{print_json, write_view, OutputMode};
use clap::Args;
use folio_core::ProjectId;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project id.
    pub id: String,
}

pub fn run_list(ctx: &AppContext, output: OutputMode) -> anyhow::Result<()> {
    let views = ctx.gallery().view_all()?;

    if output == OutputMode::Json {
        return print_json(&views);
    }

    let mut out = std::io::stdout().lock();
    if views.is_empty() {
        writeln!(out, "No projects found. Use `folio publish` to add one.")?;
    }
    for view in &views {
        write_view(&mut out, view, ctx.media_dir())?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, ctx: &AppContext, output: OutputMode) -> anyhow::Result<()> {
    let id: ProjectId = args.id.parse()?;
    let view = ctx.gallery().view(id)?;

    if output == OutputMode::Json {
        return print_json(&view);
    }
    write_view(&mut std::io::stdout().lock(), &view, ctx.media_dir())?;
    Ok(())
}
