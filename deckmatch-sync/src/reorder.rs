//! Positional Sorter: greedy left-to-right placement.
//!
//! For each target position `i`, the first slide at or after `i` carrying
//! `target[i]` is moved to `i`. Positions before `i` are final and never
//! revisited. Each move is its own remote call: a move changes the meaning of
//! every later index, so moves are not batched together.

use serde::Serialize;

use deckmatch_core::types::{Label, Template};

use crate::error::{Locus, Phase, ReconcileError};
use crate::gateway::{Request, SlideGateway, SlideId};

/// One reposition issued by the sorter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub slide: SlideId,
    pub label: Label,
}

#[derive(Debug, Clone)]
pub struct ReorderOutcome {
    pub ordered: Template,
    pub moves: Vec<Move>,
}

/// `(from, to)` pairs the sorter would issue, without touching any deck.
pub fn plan_moves(current: &[Label], target: &[Label]) -> Result<Vec<(usize, usize)>, ReconcileError> {
    let mut mirror = current.to_vec();
    let mut moves = Vec::new();
    for (i, wanted) in target.iter().enumerate() {
        let j = find_from(&mirror, wanted, i)?;
        if j != i {
            let label = mirror.remove(j);
            mirror.insert(i, label);
            moves.push((j, i));
        }
    }
    Ok(moves)
}

fn find_from(mirror: &[Label], wanted: &Label, start: usize) -> Result<usize, ReconcileError> {
    mirror
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, label)| *label == wanted)
        .map(|(j, _)| j)
        .ok_or_else(|| ReconcileError::LabelUnavailable {
            label: wanted.clone(),
            position: start,
        })
}

/// Reorder the deck in place so that its labels follow `target`.
///
/// Slides already in place cost nothing. Trailing slides beyond
/// `target.len()` are left where they are; callers check `ordered == target`.
pub fn reorder<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    mut current: Template,
    target: &[Label],
) -> Result<ReorderOutcome, ReconcileError> {
    let mut moves = Vec::new();
    for (i, wanted) in target.iter().enumerate() {
        let j = find_from(&current, wanted, i)?;
        if j == i {
            continue;
        }

        let slide = gateway
            .resolve(j)
            .map_err(ReconcileError::remote(Phase::Sort, Locus::at(j)))?;
        tracing::info!("move slide #{j} '{wanted}' ({slide}) to position #{i}");
        gateway
            .submit_batch(&[Request::reposition(&slide, i)])
            .map_err(ReconcileError::remote(Phase::Sort, Locus::slide(j, &slide)))?;

        let label = current.remove(j);
        current.insert(i, label.clone());
        moves.push(Move {
            from: j,
            to: i,
            slide,
            label,
        });
    }

    Ok(ReorderOutcome {
        ordered: current,
        moves,
    })
}
