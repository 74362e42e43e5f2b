//! Current-template discovery.
//!
//! The current template either comes with the manifest or is read from the
//! deck, labelling every slide with the display name of its layout. Either
//! way its length must equal the remote slide count.

use deckmatch_core::types::Template;

use crate::error::{Locus, Phase, ReconcileError};
use crate::gateway::SlideGateway;

/// Establish the current template for a run.
pub fn current_template<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    known: Option<&Template>,
) -> Result<Template, ReconcileError> {
    match known {
        Some(labels) => {
            let slides = gateway
                .slide_count()
                .map_err(ReconcileError::remote(Phase::Detect, Locus::default()))?;
            if labels.len() != slides {
                return Err(ReconcileError::TemplateLength {
                    labels: labels.len(),
                    slides,
                });
            }
            Ok(labels.clone())
        }
        None => {
            let detected = gateway
                .layout_labels()
                .map_err(ReconcileError::remote(Phase::Detect, Locus::default()))?;
            let template = detected
                .into_iter()
                .enumerate()
                .map(|(position, label)| label.ok_or(ReconcileError::UnlabeledSlide { position }))
                .collect::<Result<Template, _>>()?;
            tracing::debug!("detected current template: {template:?}");
            Ok(template)
        }
    }
}
