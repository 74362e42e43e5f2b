//! `deckmatch plan`: dry run against an in-memory copy of the deck.
//!
//! With `current` in the manifest no network access is needed; otherwise the
//! live deck is read once and every mutation is applied locally.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use deckmatch_sync::{diff::label_diff, pipeline, MemoryDeck, RunOptions, RunReport, SlideGateway};

use super::{connect, load_manifest, load_settings, print_report};

/// Arguments for `deckmatch plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the deck manifest (YAML).
    pub manifest: PathBuf,

    /// Emit the plan as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanJson<'a> {
    report: &'a RunReport,
    diff: String,
    /// Content was checked against slides built from labels, not the live deck.
    approximate_content: bool,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let manifest = load_manifest(&self.manifest)?;
        let settings = load_settings()?;

        let from_labels = manifest.current.is_some();
        let mut deck = match &manifest.current {
            Some(current) => MemoryDeck::from_labels(current),
            None => {
                let mut gateway = connect(&settings, &manifest.presentation_id)?;
                let snapshot = gateway
                    .snapshot()
                    .with_context(|| format!("failed to read '{}'", manifest.presentation_id))?;
                MemoryDeck::from_snapshot(&manifest.presentation_id, snapshot)
            }
        };

        let report = pipeline::run(&mut deck, &manifest, &RunOptions::from_settings(&settings))
            .with_context(|| format!("plan failed for '{}'", manifest.presentation_id))?;
        let diff = label_diff(&report.initial, &report.target);

        if self.json {
            let payload = PlanJson {
                report: &report,
                diff,
                approximate_content: from_labels,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize plan")?
            );
            return Ok(());
        }

        print_report(&report, true, from_labels);
        if diff.is_empty() {
            println!("Layouts already match the manifest.");
        } else {
            print_diff(&diff);
        }
        Ok(())
    }
}

fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            println!("{}", line.bold());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
