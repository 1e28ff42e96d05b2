//! User preference persistence for cloudgate.
//!
//! This module provides a tiny JSON-backed store for settings that change
//! rarely: the preferred theme, the regions offered on the AWS configuration
//! screen, the location of the AWS CLI and the deadline applied to provider
//! calls. The file lives in the standard configuration directory
//! (`~/.config/cloudgate/preferences.json` on most platforms) and can be
//! relocated with `CLOUDGATE_PREFERENCES_PATH`. Command-line flags take
//! precedence over anything read here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "CLOUDGATE_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A thread panicked while holding the store.
    #[error("preferences store is poisoned")]
    Poisoned,
}

/// Persisted preference values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Canonical identifier or alias of the preferred theme.
    pub preferred_theme: Option<String>,
    /// Regions offered on the AWS configuration screen. Empty means the built-in list.
    pub regions: Vec<String>,
    /// Path to the `aws` executable when it is not on `PATH`.
    pub aws_cli_path: Option<String>,
    /// Deadline for a single provider call, in seconds.
    pub task_timeout_secs: Option<u64>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Load the store from the default path (or `CLOUDGATE_PREFERENCES_PATH`).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at(default_preferences_path())
    }

    /// Load the store rooted at `path`. A missing file yields defaults.
    pub fn at(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// False for the in-memory fallback; changes then last for this session only.
    pub fn is_persistent(&self) -> bool {
        self.persist_to_disk
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every stored value.
    pub fn snapshot(&self) -> PreferencesPayload {
        self.payload.lock().map(|payload| payload.clone()).unwrap_or_default()
    }

    /// Returns the preferred theme, if one was saved.
    pub fn preferred_theme(&self) -> Option<String> {
        self.snapshot().preferred_theme
    }

    /// Record a new preferred theme identifier, writing it to disk unless the
    /// store is ephemeral.
    pub fn set_preferred_theme(&self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().map_err(|_| PreferencesError::Poisoned)?;
        payload.preferred_theme = theme_id;
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cloudgate")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
