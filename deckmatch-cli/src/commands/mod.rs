pub mod inspect;
pub mod plan;
pub mod reconcile;
pub mod thumbnail;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use deckmatch_core::{manifest, settings, DeckManifest, Settings};
use deckmatch_sync::{HttpGateway, RunReport};

pub fn load_manifest(path: &Path) -> Result<DeckManifest> {
    manifest::load(path).with_context(|| format!("failed to load manifest {}", path.display()))
}

pub fn load_settings() -> Result<Settings> {
    settings::load().context("failed to load ~/.deckmatch/config.yaml")
}

pub fn connect(settings: &Settings, presentation_id: &str) -> Result<HttpGateway> {
    HttpGateway::new(settings, presentation_id)
        .with_context(|| format!("cannot open presentation '{presentation_id}'"))
}

/// Human-readable run summary shared by `reconcile` and `plan`.
///
/// `approximate` hides content warnings computed against a deck that only
/// had title and body placeholders.
pub fn print_report(report: &RunReport, dry_run: bool, approximate: bool) {
    let (prefix, verb) = if dry_run {
        ("[plan] ", "would reconcile")
    } else {
        ("", "reconciled")
    };
    let elapsed = report.finished_at - report.started_at;
    println!(
        "{prefix}✓ '{}' {verb} ({} deleted, {} copied, {} moved, {} slides written, {} batches, {} ms)",
        report.presentation_id,
        report.deleted.len(),
        report.duplicated.iter().map(|d| d.copies).sum::<usize>(),
        report.moves.len(),
        report.content.len(),
        report.batches,
        elapsed.num_milliseconds(),
    );

    for d in &report.deleted {
        println!("  {}  delete #{} '{}' ({})", "✗".red(), d.position, d.label, d.slide);
    }
    for d in &report.duplicated {
        println!(
            "  {}  copy #{} '{}' ({}) x{}",
            "+".green(),
            d.position,
            d.label,
            d.slide,
            d.copies
        );
    }
    for m in &report.moves {
        println!(
            "  {}  move #{} -> #{} '{}' ({})",
            "~".cyan(),
            m.from,
            m.to,
            m.label,
            m.slide
        );
    }
    for c in &report.content {
        println!(
            "  ✎  write #{} ({}) {} requests",
            c.position, c.slide, c.request_count
        );
    }
    if approximate {
        let hidden = report.warnings().count();
        if hidden > 0 {
            println!(
                "  {}  {hidden} content warnings hidden; slide placeholders were not read from the deck",
                "·".bright_black()
            );
        }
        return;
    }
    for w in report.warnings() {
        println!("  {}  {}", "!".yellow(), w.yellow());
    }
}
