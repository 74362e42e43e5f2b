//! Error types for deckmatch-sync.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use deckmatch_core::types::{Label, Template};

use crate::gateway::{ElementKind, GatewayError, SlideId};

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Reading the current template from the deck.
    Detect,
    Delete,
    Expand,
    Sort,
    Content,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Detect => write!(f, "detect"),
            Phase::Delete => write!(f, "delete"),
            Phase::Expand => write!(f, "expand"),
            Phase::Sort => write!(f, "sort"),
            Phase::Content => write!(f, "content"),
        }
    }
}

/// Where in the deck a remote failure happened, when known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locus {
    pub position: Option<usize>,
    pub slide: Option<SlideId>,
}

impl Locus {
    pub fn at(position: usize) -> Self {
        Self {
            position: Some(position),
            slide: None,
        }
    }

    pub fn slide(position: usize, slide: &SlideId) -> Self {
        Self {
            position: Some(position),
            slide: Some(slide.clone()),
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }
        if let Some(slide) = &self.slide {
            write!(f, " (slide {slide})")?;
        }
        Ok(())
    }
}

/// All errors that can end a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A gateway read or batch failed; the phase was aborted.
    #[error("{phase} phase: remote call failed{locus}: {source}")]
    Remote {
        phase: Phase,
        locus: Locus,
        #[source]
        source: GatewayError,
    },

    /// The slide lacks a placeholder the content needs.
    #[error("slide at position {position} has no {kind} placeholder #{index}")]
    MissingElement {
        position: usize,
        kind: ElementKind,
        index: usize,
    },

    /// The sorter found no slide carrying `label` at or after `position`.
    #[error("sort phase: no slide labelled '{label}' at or after position {position}")]
    LabelUnavailable { label: Label, position: usize },

    /// The deck does not match the target after ordering.
    #[error("deck does not match target after ordering: expected {expected:?}, got {actual:?}")]
    PostconditionFailed { expected: Template, actual: Template },

    /// The supplied current template disagrees with the remote slide count.
    #[error("current template lists {labels} labels but the deck has {slides} slides")]
    TemplateLength { labels: usize, slides: usize },

    #[error("slide at position {position} has no layout label")]
    UnlabeledSlide { position: usize },

    /// Text rendering of slide content failed.
    #[error("render error: {0}")]
    Render(#[from] tera::Error),
}

impl ReconcileError {
    pub(crate) fn remote(phase: Phase, locus: Locus) -> impl FnOnce(GatewayError) -> Self {
        move |source| ReconcileError::Remote {
            phase,
            locus,
            source,
        }
    }

    /// Phase the failure is attributed to.
    pub fn phase(&self) -> Phase {
        match self {
            ReconcileError::Remote { phase, .. } => *phase,
            ReconcileError::MissingElement { .. } | ReconcileError::Render(_) => Phase::Content,
            ReconcileError::LabelUnavailable { .. } | ReconcileError::PostconditionFailed { .. } => {
                Phase::Sort
            }
            ReconcileError::TemplateLength { .. } | ReconcileError::UnlabeledSlide { .. } => {
                Phase::Detect
            }
        }
    }
}
