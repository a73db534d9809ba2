// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User settings persistence — a single JSON file holding the Paperless
// connection, default tags, and the preferred enhancement mode.
//
// Writes go to a temporary file in the target directory and are renamed into
// place, so a reader never observes a half-written file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::error::{DocuscanError, Result};

/// Tag applied when the user has not configured any defaults.
pub const FALLBACK_TAG: &str = "docu_scan";

/// User-configurable settings. Field names are camelCase on disk and on the
/// wire; unknown fields are ignored and missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub paperless_url: String,
    pub paperless_token: String,
    /// Comma-joined tag names.
    pub paperless_default_tags: String,
    pub default_enhancement: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            paperless_url: String::new(),
            paperless_token: String::new(),
            paperless_default_tags: FALLBACK_TAG.to_string(),
            default_enhancement: "auto".to_string(),
        }
    }
}

impl UserSettings {
    /// Default tags as a list: split on commas, trimmed, blanks dropped.
    pub fn default_tags(&self) -> Vec<String> {
        let tags: Vec<String> = self
            .paperless_default_tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tags.is_empty() {
            vec![FALLBACK_TAG.to_string()]
        } else {
            tags
        }
    }
}

/// Reads and writes [`UserSettings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, substituting defaults when the file is absent or
    /// unreadable. Never fails.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> UserSettings {
        if !self.path.exists() {
            debug!("settings file absent, using defaults");
            return UserSettings::default();
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "failed to read settings, using defaults");
                return UserSettings::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "failed to parse settings, using defaults");
                UserSettings::default()
            }
        }
    }

    /// Persist settings, creating the parent directory on first write.
    #[instrument(skip(self, settings), fields(path = %self.path.display()))]
    pub fn save(&self, settings: &UserSettings) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let json = serde_json::to_string_pretty(settings)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        info!("settings saved");
        Ok(())
    }

    fn write_error(&self, err: std::io::Error) -> DocuscanError {
        DocuscanError::SettingsWrite {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
