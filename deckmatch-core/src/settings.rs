//! User settings at `<home>/.deckmatch/config.yaml`.
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`
//!
//! Environment variables win over the file: `DECKMATCH_ACCESS_TOKEN`,
//! `DECKMATCH_API_BASE`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub const DEFAULT_API_BASE: &str = "https://slides.googleapis.com/v1";
pub const DEFAULT_BULLET_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ACCESS_TOKEN: &str = "DECKMATCH_ACCESS_TOKEN";
pub const ENV_API_BASE: &str = "DECKMATCH_API_BASE";

/// Connection and formatting settings for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the slides REST API, without trailing slash.
    pub api_base: String,
    /// OAuth bearer token. Obtaining it is the caller's business.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    /// Preset used by `createParagraphBullets`.
    pub bullet_preset: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bullet_preset: DEFAULT_BULLET_PRESET.to_string(),
        }
    }
}

impl Settings {
    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty()) {
            self.access_token = Some(token);
        }
        if let Some(base) = lookup(ENV_API_BASE).filter(|b| !b.is_empty()) {
            self.api_base = base;
        }
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self
    }
}

/// `<home>/.deckmatch/config.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".deckmatch").join("config.yaml")
}

/// Load settings from `<home>/.deckmatch/config.yaml`, falling back to
/// defaults when the file is absent, then apply environment overrides.
pub fn load_at(home: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path_at(home);
    let settings = if path.exists() {
        let contents = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse { path, source })?
    } else {
        Settings::default()
    };
    Ok(settings.with_overrides(|key| std::env::var(key).ok()))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, SettingsError> {
    let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
    load_at(&home)
}
