//! `folio` operator CLI.
//!
//! # Responsibility
//! - Drive the gallery façade from a terminal in place of the web UI.
//! - Act as the admin gate: whoever can run this binary against the data
//!   directory is the operator, and receives an `AdminToken`.

mod cmd;
mod context;
mod output;

use clap::{Parser, Subcommand};
use context::AppContext;
use output::OutputMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "folio: project gallery store",
    long_about = None
)]
struct Cli {
    /// Config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "folio.toml")]
    config: PathBuf,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Operator label recorded in logs for mutating commands.
    #[arg(long, global = true, default_value = "local")]
    operator: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Publish a new project",
        after_help = "EXAMPLES:\n    folio publish --title \"Alpha\" --description-file body.html --image a.png --image b.png"
    )]
    Publish(cmd::publish::PublishArgs),

    #[command(about = "List every project, newest first")]
    List,

    #[command(about = "Show one project with its images")]
    Show(cmd::show::ShowArgs),

    #[command(about = "Remove a project and its images")]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        about = "Find media folders no project references",
        after_help = "EXAMPLES:\n    # Report only\n    folio sweep\n\n    # Delete the orphans\n    folio sweep --delete"
    )]
    Sweep(cmd::maintenance::SweepArgs),

    #[command(about = "Report projects whose media folder is missing")]
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = cli.output_mode();
    let ctx = AppContext::open(&cli.config)?;

    match &cli.command {
        Commands::Publish(args) => cmd::publish::run_publish(args, &ctx, &cli.operator, output),
        Commands::List => cmd::show::run_list(&ctx, output),
        Commands::Show(args) => cmd::show::run_show(args, &ctx, output),
        Commands::Remove(args) => cmd::remove::run_remove(args, &ctx, &cli.operator, output),
        Commands::Sweep(args) => cmd::maintenance::run_sweep(args, &ctx, &cli.operator, output),
        Commands::Check => cmd::maintenance::run_check(&ctx, output),
    }
}
