//! Deckmatch: reconcile a slide deck against a target layout template.
//!
//! # Usage
//!
//! ```text
//! deckmatch reconcile <manifest> [--skip-content] [--json]
//! deckmatch plan <manifest> [--json]
//! deckmatch inspect <presentation-id> [--json]
//! deckmatch thumbnail <presentation-id> <page> <output>
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    inspect::InspectArgs, plan::PlanArgs, reconcile::ReconcileArgs, thumbnail::ThumbnailArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "deckmatch",
    version,
    about = "Reconcile a slide deck against a target layout template",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Delete, duplicate and reorder slides to match a manifest, then write content.
    Reconcile(ReconcileArgs),

    /// Show what reconcile would do, without touching the remote deck.
    Plan(PlanArgs),

    /// List the slides of a remote deck with their layout labels.
    Inspect(InspectArgs),

    /// Download the thumbnail of one slide.
    Thumbnail(ThumbnailArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Reconcile(args) => args.run(),
        Commands::Plan(args) => args.run(),
        Commands::Inspect(args) => args.run(),
        Commands::Thumbnail(args) => args.run(),
    }
}
