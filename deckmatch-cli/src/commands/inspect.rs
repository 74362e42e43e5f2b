//! `deckmatch inspect`: list the slides of a remote deck.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use deckmatch_sync::{
    gateway::{ElementKind, SlideSnapshot},
    SlideGateway,
};

use super::{connect, load_settings};

/// Arguments for `deckmatch inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    pub presentation_id: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InspectJson {
    presentation_id: String,
    fetched_at: DateTime<Utc>,
    slides: Vec<SlideRow>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct SlideRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "slide")]
    slide: String,
    #[tabled(rename = "layout")]
    layout: String,
    #[tabled(rename = "text")]
    text: usize,
    #[tabled(rename = "images")]
    images: usize,
    #[tabled(rename = "tables")]
    tables: usize,
}

impl SlideRow {
    fn new(position: usize, slide: &SlideSnapshot) -> Self {
        let count = |kind: ElementKind| slide.elements.iter().filter(|e| e.kind == kind).count();
        Self {
            position,
            slide: slide.id.to_string(),
            layout: slide
                .layout
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            text: count(ElementKind::Text),
            images: count(ElementKind::Image),
            tables: count(ElementKind::Table),
        }
    }
}

impl InspectArgs {
    pub fn run(self) -> Result<()> {
        let settings = load_settings()?;
        let mut gateway = connect(&settings, &self.presentation_id)?;
        let snapshot = gateway
            .snapshot()
            .with_context(|| format!("failed to read '{}'", self.presentation_id))?;
        let rows: Vec<SlideRow> = snapshot
            .iter()
            .enumerate()
            .map(|(position, slide)| SlideRow::new(position, slide))
            .collect();

        if self.json {
            let payload = InspectJson {
                presentation_id: self.presentation_id,
                fetched_at: Utc::now(),
                slides: rows,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize slides")?
            );
            return Ok(());
        }

        println!("'{}' | {} slides", self.presentation_id, rows.len());
        if rows.is_empty() {
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
