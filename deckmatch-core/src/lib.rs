//! Deckmatch core library: domain types, deck manifests, user settings, errors.
//!
//! Public API surface:
//! - [`types`]: labels, templates and slide descriptors
//! - [`manifest`]: load / validate a deck manifest
//! - [`settings`]: `~/.deckmatch/config.yaml` with env overrides
//! - [`error`]: [`ManifestError`], [`SettingsError`]

pub mod error;
pub mod manifest;
pub mod settings;
pub mod types;

pub use error::{ManifestError, SettingsError};
pub use manifest::DeckManifest;
pub use settings::Settings;
pub use types::{Body, Label, SlideDescriptor, Template};
