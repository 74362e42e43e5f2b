//! # deckmatch-sync
//!
//! Reconciles a remote slide deck against a target template.
//!
//! Call [`run`] with a [`SlideGateway`] and a loaded manifest to delete,
//! duplicate and reorder slides until the deck's layout labels equal the
//! target, then write each slide's text and images. [`HttpGateway`] talks to
//! the Slides REST API; [`MemoryDeck`] applies the same requests locally and
//! backs dry runs and tests.

pub mod content;
pub mod detect;
pub mod diff;
pub mod error;
pub mod expand;
pub mod filter;
pub mod gateway;
pub mod pipeline;
pub mod reorder;

pub use error::{Phase, ReconcileError};
pub use gateway::{GatewayError, HttpGateway, MemoryDeck, Request, SlideGateway, SlideId};
pub use pipeline::{reconcile_order, run, OrderOutcome, RunOptions, RunReport};
