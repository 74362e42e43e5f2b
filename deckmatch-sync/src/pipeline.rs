//! Reconciliation entrypoint used by `deckmatch reconcile` and `deckmatch plan`.
//!
//! Phases run strictly in order, each taking the previous phase's template:
//!
//! ```text
//! detect -> delete -> expand -> sort -> (check current == target) -> content
//! ```
//!
//! A failed remote call aborts the run in the phase that made it; nothing is
//! retried.

use chrono::{DateTime, Utc};
use serde::Serialize;

use deckmatch_core::{types::Label, DeckManifest, Settings, Template};

use crate::content::{self, SlideContent};
use crate::detect;
use crate::error::ReconcileError;
use crate::expand::{self, Duplication};
use crate::filter::{self, Deletion};
use crate::gateway::SlideGateway;
use crate::reorder::{self, Move};

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Run the Content Writer after ordering.
    pub write_content: bool,
    pub bullet_preset: String,
}

impl RunOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            write_content: true,
            bullet_preset: settings.bullet_preset.clone(),
        }
    }
}

/// Output of the three ordering phases.
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub ordered: Template,
    pub deleted: Vec<Deletion>,
    pub duplicated: Vec<Duplication>,
    pub moves: Vec<Move>,
}

impl OrderOutcome {
    /// Remote batches issued by the ordering phases.
    pub fn batch_count(&self) -> usize {
        usize::from(!self.deleted.is_empty()) + self.duplicated.len() + self.moves.len()
    }
}

/// Everything a run did, in a shape suitable for printing or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub presentation_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub initial: Template,
    pub target: Template,
    pub result: Template,
    pub deleted: Vec<Deletion>,
    pub duplicated: Vec<Duplication>,
    pub moves: Vec<Move>,
    pub content: Vec<SlideContent>,
    pub batches: usize,
}

impl RunReport {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .flat_map(|c| c.warnings.iter().map(String::as_str))
    }
}

/// Delete, expand and sort so that the deck's labels equal `target`.
///
/// Fails with [`ReconcileError::PostconditionFailed`] when the phases finish
/// without reaching the target, e.g. when the deck holds surplus copies of a
/// label.
pub fn reconcile_order<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    current: Template,
    target: &[Label],
) -> Result<OrderOutcome, ReconcileError> {
    let deletion = filter::filter(gateway, current, target)?;
    let expansion = expand::expand(gateway, deletion.survivors, target)?;
    let sorted = reorder::reorder(gateway, expansion.expanded, target)?;

    if sorted.ordered != target {
        return Err(ReconcileError::PostconditionFailed {
            expected: target.to_vec(),
            actual: sorted.ordered,
        });
    }

    Ok(OrderOutcome {
        ordered: sorted.ordered,
        deleted: deletion.deleted,
        duplicated: expansion.duplications,
        moves: sorted.moves,
    })
}

/// Run a full reconciliation of `manifest` against the gateway's deck.
pub fn run<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    manifest: &DeckManifest,
    options: &RunOptions,
) -> Result<RunReport, ReconcileError> {
    let started_at = Utc::now();
    let target = manifest.target_template();
    let initial = detect::current_template(gateway, manifest.current.as_ref())?;
    tracing::info!(
        "reconciling '{}': {} slides -> {} slides",
        manifest.presentation_id,
        initial.len(),
        target.len()
    );

    let order = reconcile_order(gateway, initial.clone(), &target)?;
    let mut batches = order.batch_count();

    let content = if options.write_content {
        let written = content::write_content(gateway, &manifest.slides, &options.bullet_preset)?;
        batches += written.len();
        written
    } else {
        Vec::new()
    };

    Ok(RunReport {
        presentation_id: manifest.presentation_id.clone(),
        started_at,
        finished_at: Utc::now(),
        initial,
        target,
        result: order.ordered,
        deleted: order.deleted,
        duplicated: order.duplicated,
        moves: order.moves,
        content,
        batches,
    })
}

#[cfg(test)]
mod tests {
    use deckmatch_core::types::{template, Body, SlideDescriptor};

    use super::*;
    use crate::error::Phase;
    use crate::gateway::MemoryDeck;

    fn manifest(current: Option<Template>, layouts: &[&str]) -> DeckManifest {
        DeckManifest {
            presentation_id: "memory".into(),
            current,
            slides: layouts
                .iter()
                .enumerate()
                .map(|(page, layout)| SlideDescriptor {
                    page,
                    layout: Label::from(*layout),
                    title: format!("Slide {page}"),
                    body: Body::Description {
                        text: format!("about {layout}"),
                    },
                    image_urls: vec![],
                    reference: None,
                })
                .collect(),
        }
    }

    fn options() -> RunOptions {
        RunOptions::from_settings(&Settings::default())
    }

    #[test]
    fn full_run_reaches_target_and_writes_titles() {
        let current = template(["cover", "text", "image", "video", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        let m = manifest(None, &["cover", "image", "text", "text", "closing"]);

        let report = run(&mut deck, &m, &options()).expect("run");
        assert_eq!(report.result, m.target_template());
        assert_eq!(deck.labels(), m.target_template());
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.duplicated.len(), 1);
        assert_eq!(report.content.len(), 5);
        assert_eq!(deck.batches().len(), report.batches);
        for (position, slide) in m.slides.iter().enumerate() {
            assert_eq!(deck.elements(position)[0].text, slide.title);
        }
    }

    #[test]
    fn skip_content_leaves_text_alone() {
        let current = template(["cover", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        let m = manifest(Some(current.clone()), &["cover", "closing"]);
        let opts = RunOptions {
            write_content: false,
            ..options()
        };
        let report = run(&mut deck, &m, &opts).expect("run");
        assert_eq!(report.batches, 0);
        assert!(deck.batches().is_empty());
    }

    #[test]
    fn surplus_copies_fail_the_postcondition() {
        let current = template(["cover", "text", "text", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        let err = reconcile_order(&mut deck, current, &template(["cover", "text", "closing"]))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PostconditionFailed { .. }));
        assert_eq!(err.phase(), Phase::Sort);
    }

    #[test]
    fn remote_failure_names_the_phase() {
        let current = template(["cover", "text", "closing"]);
        let mut deck = MemoryDeck::from_labels(&current);
        deck.reject_batch(0);
        let err = reconcile_order(
            &mut deck,
            current,
            &template(["cover", "text", "text", "closing"]),
        )
        .unwrap_err();
        assert_eq!(err.phase(), Phase::Expand);
        assert!(err.to_string().contains("position 1"), "got: {err}");
    }
}
