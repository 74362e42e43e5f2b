//! Domain types shared by the reconciliation engine and the CLI.
//!
//! A [`Label`] names a slide's layout category; a [`Template`] is an ordered
//! sequence of labels, one per slide. [`SlideDescriptor`] is what the
//! content-generation step hands over for each target slide.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque layout tag of a slide (e.g. `"cover"`, `"only text"`).
///
/// Only equality matters; labels carry no internal structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Ordered labels, one per slide position.
pub type Template = Vec<Label>;

/// Build a [`Template`] from string literals.
pub fn template<I, S>(labels: I) -> Template
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(|s| Label(s.into())).collect()
}

/// `label -> number of occurrences` over a template.
pub fn label_counts(labels: &[Label]) -> HashMap<&Label, usize> {
    let mut counts = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Slide content
// ---------------------------------------------------------------------------

/// Body text of a slide.
///
/// Untagged so manifests read naturally:
///
/// ```yaml
/// body:
///   subject: Types of AI
///   points: [Computer Vision, NLP]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// A subject line followed by indented bullet points.
    Bullets { subject: String, points: Vec<String> },
    /// A single block of prose.
    Description { text: String },
    /// A grid of cell strings, rendered as a table on the slide.
    Table { rows: Vec<Vec<String>> },
}

/// Everything the content-generation step decided for one target slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    /// Target position of this slide in the finished deck.
    pub page: usize,
    pub layout: Label,
    pub title: String,
    pub body: Body,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Reference link for figures or citations; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
