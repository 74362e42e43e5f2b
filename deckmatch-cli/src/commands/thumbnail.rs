//! `deckmatch thumbnail`: save a slide preview image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use deckmatch_sync::SlideGateway;

use super::{connect, load_settings};

/// Arguments for `deckmatch thumbnail`.
#[derive(Args, Debug)]
pub struct ThumbnailArgs {
    pub presentation_id: String,

    /// Zero-based slide position.
    pub page: usize,

    /// File to write the PNG to.
    pub output: PathBuf,
}

impl ThumbnailArgs {
    pub fn run(self) -> Result<()> {
        let settings = load_settings()?;
        let mut gateway = connect(&settings, &self.presentation_id)?;

        let url = gateway
            .thumbnail_url(self.page)
            .with_context(|| format!("no thumbnail for slide #{}", self.page))?;
        let bytes = gateway
            .fetch_bytes(&url)
            .context("failed to download thumbnail")?;
        std::fs::write(&self.output, &bytes)
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        println!(
            "✓ slide #{} of '{}' saved to {} ({} bytes)",
            self.page,
            self.presentation_id,
            self.output.display(),
            bytes.len()
        );
        Ok(())
    }
}
