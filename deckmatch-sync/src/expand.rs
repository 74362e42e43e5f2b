//! Multiplicity Expander: duplicate slides whose label the target repeats.
//!
//! The first occurrence of each label is the origin: it receives
//! `need[label] - 1` copies, inserted right after it. Later occurrences of an
//! already-expanded label are left alone. This phase never removes slides.

use std::collections::HashSet;

use serde::Serialize;

use deckmatch_core::types::{label_counts, Label, Template};

use crate::error::{Locus, Phase, ReconcileError};
use crate::gateway::{Request, SlideGateway, SlideId};

/// Copies made of one origin slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplication {
    /// Origin position at the time of duplication.
    pub position: usize,
    pub slide: SlideId,
    pub label: Label,
    pub copies: usize,
}

#[derive(Debug, Clone)]
pub struct ExpansionOutcome {
    pub expanded: Template,
    /// Every submitted request, one batch per origin, flattened.
    pub requests: Vec<Request>,
    pub duplications: Vec<Duplication>,
}

/// Duplicate origins until each target label's demand is met.
pub fn expand<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    mut current: Template,
    target: &[Label],
) -> Result<ExpansionOutcome, ReconcileError> {
    let need = label_counts(target);
    let mut seen: HashSet<Label> = HashSet::new();
    let mut requests = Vec::new();
    let mut duplications = Vec::new();

    let mut cursor = 0;
    while cursor < current.len() {
        let label = current[cursor].clone();
        let copies = if seen.insert(label.clone()) {
            need.get(&label).copied().unwrap_or(0).saturating_sub(1)
        } else {
            0
        };
        if copies == 0 {
            cursor += 1;
            continue;
        }

        let slide = gateway
            .resolve(cursor)
            .map_err(ReconcileError::remote(Phase::Expand, Locus::at(cursor)))?;
        tracing::info!("copy slide #{cursor} '{label}' ({slide}) {copies} times");
        let batch = vec![Request::duplicate_object(&slide); copies];
        gateway
            .submit_batch(&batch)
            .map_err(ReconcileError::remote(Phase::Expand, Locus::slide(cursor, &slide)))?;

        for k in 0..copies {
            current.insert(cursor + 1 + k, label.clone());
        }
        requests.extend(batch);
        duplications.push(Duplication {
            position: cursor,
            slide,
            label,
            copies,
        });
        cursor += copies + 1;
    }

    Ok(ExpansionOutcome {
        expanded: current,
        requests,
        duplications,
    })
}
