//! `folio sweep` and `folio check` — recovery tools for crash leftovers.

use crate::context::{admin_token, AppContext};
use crate::output::{print_json, OutputMode};
use clap::Args;
use folio_core::SweepMode;
use serde_json::json;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Delete orphan folders instead of only listing them.
    #[arg(long)]
    pub delete: bool,
}

pub fn run_sweep(
    args: &SweepArgs,
    ctx: &AppContext,
    operator: &str,
    output: OutputMode,
) -> anyhow::Result<()> {
    let token = admin_token(operator)?;
    let mode = if args.delete {
        SweepMode::Delete
    } else {
        SweepMode::DryRun
    };
    let report = ctx.gallery().sweep_orphans(&token, mode)?;

    if output == OutputMode::Json {
        return print_json(&report);
    }
    if report.orphans.is_empty() {
        println!("No orphan media folders.");
        return Ok(());
    }
    for slug in &report.orphans {
        let state = if report.removed.contains(slug) {
            "removed"
        } else {
            "orphan"
        };
        println!("{state}: {}", ctx.media_dir().join(slug.as_str()).display());
    }
    Ok(())
}

pub fn run_check(ctx: &AppContext, output: OutputMode) -> anyhow::Result<()> {
    let missing = ctx.gallery().integrity_report()?;

    if output == OutputMode::Json {
        return print_json(&json!({ "media_missing": missing }));
    }
    if missing.is_empty() {
        println!("All project media folders are present.");
    }
    for id in missing {
        println!("project #{id}: media folder missing");
    }
    Ok(())
}
