//! `deckmatch reconcile`: bring a remote deck in line with a manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use deckmatch_sync::{pipeline, RunOptions};

use super::{connect, load_manifest, load_settings, print_report};

/// Arguments for `deckmatch reconcile`.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Path to the deck manifest (YAML).
    pub manifest: PathBuf,

    /// Only delete, copy and reorder slides; leave their text and images alone.
    #[arg(long)]
    pub skip_content: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReconcileArgs {
    pub fn run(self) -> Result<()> {
        let manifest = load_manifest(&self.manifest)?;
        let settings = load_settings()?;
        let mut gateway = connect(&settings, &manifest.presentation_id)?;

        let options = RunOptions {
            write_content: !self.skip_content,
            ..RunOptions::from_settings(&settings)
        };
        let report = pipeline::run(&mut gateway, &manifest, &options)
            .with_context(|| format!("reconcile failed for '{}'", manifest.presentation_id))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_report(&report, false, false);
        }
        Ok(())
    }
}
