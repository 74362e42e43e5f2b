//! Error types for deckmatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or validating a deck manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The manifest file did not exist at the given path.
    #[error("manifest not found at {path}")]
    NotFound { path: PathBuf },

    #[error("manifest has an empty presentation_id")]
    EmptyPresentationId,

    #[error("manifest lists no slides")]
    NoSlides,

    /// Two descriptors claim the same target page.
    #[error("page {page} is assigned to more than one slide")]
    DuplicatePage { page: usize },

    /// Pages must run 0..n without gaps.
    #[error("page {page} is missing; pages must be contiguous from 0")]
    MissingPage { page: usize },
}

/// All errors that can arise from loading user settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.deckmatch/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
