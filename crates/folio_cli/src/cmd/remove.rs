//! `folio remove` — delete a project row, then its media folder.

use crate::context::{admin_token, AppContext};
use crate::output::{print_json, OutputMode};
use clap::Args;
use folio_core::ProjectId;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project id.
    pub id: String,
}

pub fn run_remove(
    args: &RemoveArgs,
    ctx: &AppContext,
    operator: &str,
    output: OutputMode,
) -> anyhow::Result<()> {
    let token = admin_token(operator)?;
    let id: ProjectId = args.id.parse()?;
    let removed = ctx.gallery().remove(&token, id)?;

    if output == OutputMode::Json {
        return print_json(&removed);
    }
    println!(
        "Removed project #{} ({}){}",
        removed.project.id,
        removed.project.title,
        if removed.media_removed {
            " and its images"
        } else {
            ""
        }
    );
    Ok(())
}
