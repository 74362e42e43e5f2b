//! Deck manifest: the hand-off from the content-generation step.
//!
//! # File format
//!
//! ```yaml
//! presentation_id: 1grCs_IvDi99S5WHHBEajo4E_nb3P1UySIycvEk1tVfA
//! current:               # optional; detected from slide layouts when omitted
//!   - cover
//!   - only text
//!   - closing
//! slides:
//!   - page: 0
//!     layout: cover
//!     title: Attention is all you need
//!     body: { text: "Vaswani et al." }
//!   - page: 1
//!     layout: closing
//!     title: Thanks for watching
//!     body: { text: "" }
//! ```
//!
//! Slides are sorted by `page` on load; pages must be unique and run from 0
//! without gaps so that the target template is well defined.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::types::{SlideDescriptor, Template};

/// A validated deck manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckManifest {
    pub presentation_id: String,
    /// Labels of the live deck, in slide order, when known up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Template>,
    pub slides: Vec<SlideDescriptor>,
}

impl DeckManifest {
    /// Desired final slide order, as labels.
    pub fn target_template(&self) -> Template {
        self.slides.iter().map(|s| s.layout.clone()).collect()
    }

    /// Sort slides by page and check the page numbering.
    pub fn validate(mut self) -> Result<Self, ManifestError> {
        if self.presentation_id.trim().is_empty() {
            return Err(ManifestError::EmptyPresentationId);
        }
        if self.slides.is_empty() {
            return Err(ManifestError::NoSlides);
        }

        let mut seen = BTreeSet::new();
        for slide in &self.slides {
            if !seen.insert(slide.page) {
                return Err(ManifestError::DuplicatePage { page: slide.page });
            }
        }
        if let Some(page) = (0..self.slides.len()).find(|p| !seen.contains(p)) {
            return Err(ManifestError::MissingPage { page });
        }

        self.slides.sort_by_key(|s| s.page);
        Ok(self)
    }
}

/// Parse and validate a manifest from YAML text. `path` is used for error context.
pub fn parse(contents: &str, path: &Path) -> Result<DeckManifest, ManifestError> {
    let manifest: DeckManifest =
        serde_yaml::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    manifest.validate()
}

/// Load and validate the manifest at `path`.
///
/// Returns `ManifestError::NotFound` if absent,
/// `ManifestError::Parse` (with path + line context) if malformed YAML.
pub fn load(path: &Path) -> Result<DeckManifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}
