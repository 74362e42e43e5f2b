//! Deletion Filter: drop slides whose label the target never mentions.
//!
//! Membership, not multiplicity, gates deletion: three `"only text"` slides
//! survive even if the target asks for one. No later phase thins surpluses.

use std::collections::HashSet;

use serde::Serialize;

use deckmatch_core::types::{Label, Template};

use crate::error::{Locus, Phase, ReconcileError};
use crate::gateway::{Request, SlideGateway, SlideId};

/// A slide removed by the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    /// Position in the template the filter received.
    pub position: usize,
    pub slide: SlideId,
    pub label: Label,
}

#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub survivors: Template,
    /// The batch that was submitted; empty when nothing was deleted.
    pub requests: Vec<Request>,
    pub deleted: Vec<Deletion>,
}

/// Positions whose label has zero occurrences in `target`, ascending.
pub fn plan_deletions(current: &[Label], target: &[Label]) -> Vec<usize> {
    let wanted: HashSet<&Label> = target.iter().collect();
    current
        .iter()
        .enumerate()
        .filter(|(_, label)| !wanted.contains(label))
        .map(|(i, _)| i)
        .collect()
}

/// Delete every slide whose label is absent from `target`, in one batch.
///
/// Identities are resolved before the batch goes out; the local mirror is
/// trimmed highest index first once the batch is accepted.
pub fn filter<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    mut current: Template,
    target: &[Label],
) -> Result<DeletionOutcome, ReconcileError> {
    let mut marked = plan_deletions(&current, target);
    if marked.is_empty() {
        tracing::debug!("delete: nothing to remove");
        return Ok(DeletionOutcome {
            survivors: current,
            requests: Vec::new(),
            deleted: Vec::new(),
        });
    }
    marked.reverse();

    let ids = gateway
        .resolve_all(&marked)
        .map_err(ReconcileError::remote(Phase::Delete, Locus::default()))?;

    let requests: Vec<Request> = ids.iter().map(Request::delete_object).collect();
    for (&position, id) in marked.iter().zip(&ids) {
        tracing::info!("delete slide #{position} '{}' ({id})", current[position]);
    }
    gateway
        .submit_batch(&requests)
        .map_err(ReconcileError::remote(Phase::Delete, Locus::default()))?;

    let mut deleted = Vec::with_capacity(marked.len());
    for (position, slide) in marked.into_iter().zip(ids) {
        let label = current.remove(position);
        deleted.push(Deletion {
            position,
            slide,
            label,
        });
    }
    deleted.reverse();

    Ok(DeletionOutcome {
        survivors: current,
        requests,
        deleted,
    })
}

#[cfg(test)]
mod tests {
    use deckmatch_core::types::template;

    use super::*;
    use crate::gateway::{GatewayError, MemoryDeck};

    #[test]
    fn plan_is_membership_only() {
        let current = template(["cover", "text", "text", "text", "video", "closing"]);
        let target = template(["cover", "text", "closing"]);
        assert_eq!(plan_deletions(&current, &target), vec![4]);
    }

    #[test]
    fn removes_absent_labels_in_one_batch() {
        let current = template(["cover", "table", "text", "video", "closing"]);
        let target = template(["cover", "text", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        let ids = deck.slide_ids();

        let out = filter(&mut deck, current, &target).expect("filter");
        assert_eq!(out.survivors, template(["cover", "text", "closing"]));
        assert_eq!(deck.labels(), out.survivors);
        assert_eq!(deck.batches().len(), 1);
        assert_eq!(out.requests.len(), 2);
        assert_eq!(
            out.deleted.iter().map(|d| d.position).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(out.deleted[1].slide, ids[3]);
    }

    #[test]
    fn nothing_marked_means_no_remote_call() {
        let current = template(["cover", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        let out = filter(&mut deck, current.clone(), &current).expect("filter");
        assert!(out.requests.is_empty());
        assert!(deck.batches().is_empty());
    }

    #[test]
    fn rejected_batch_keeps_local_mirror_out_of_it() {
        let current = template(["cover", "video"]);
        let mut deck = MemoryDeck::from_labels(&current);
        deck.reject_batch(0);
        let err = filter(&mut deck, current, &template(["cover"])).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Remote {
                phase: Phase::Delete,
                source: GatewayError::Http { .. },
                ..
            }
        ));
        assert_eq!(deck.labels(), template(["cover", "video"]));
    }
}
