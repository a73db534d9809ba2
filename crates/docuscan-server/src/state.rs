// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared application state and Paperless credential resolution.

use docuscan_core::{DocuscanError, ServiceConfig, SettingsStore, UserSettings};
use docuscan_document::ComposeOptions;
use docuscan_paperless::PaperlessClient;
use tokio::sync::Mutex;

use crate::error::ApiError;

pub struct AppState {
    pub config: ServiceConfig,
    pub settings: SettingsStore,
    /// Held for the duration of a settings write.
    pub settings_lock: Mutex<()>,
}

/// URL and token that a Paperless call will use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperlessCredentials {
    pub url: String,
    pub token: String,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let settings = SettingsStore::new(config.storage.settings_file.clone());
        Self {
            config,
            settings,
            settings_lock: Mutex::new(()),
        }
    }

    pub fn paperless_enabled(&self) -> bool {
        self.config.paperless.enabled
    }

    /// Compositor options from config, with an optional per-request quality.
    pub fn compose_options(&self, quality: Option<u32>) -> ComposeOptions {
        let options = ComposeOptions::from(&self.config.pdf);
        match quality {
            Some(q) => options.with_quality(q.clamp(1, 100) as u8),
            None => options,
        }
    }

    /// Pick URL and token: request override, then saved settings, then the
    /// static config. Blank values fall through to the next source.
    pub fn resolve_credentials(
        &self,
        saved: &UserSettings,
        url_override: Option<&str>,
        token_override: Option<&str>,
    ) -> Result<PaperlessCredentials, ApiError> {
        let url = first_non_blank([
            url_override,
            Some(saved.paperless_url.as_str()),
            Some(self.config.paperless.url.as_str()),
        ])
        .ok_or(DocuscanError::MissingConfig("Paperless URL"))?;
        let token = first_non_blank([
            token_override,
            Some(saved.paperless_token.as_str()),
            Some(self.config.paperless.token.as_str()),
        ])
        .ok_or(DocuscanError::MissingConfig("Paperless API token"))?;
        Ok(PaperlessCredentials {
            url: url.to_string(),
            token: token.to_string(),
        })
    }

    /// Read the saved settings on the blocking pool.
    pub async fn load_settings(&self) -> Result<UserSettings, ApiError> {
        let store = self.settings.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|err| ApiError::Internal(format!("Failed to load settings: {err}")))
    }

    /// Write settings on the blocking pool. Writers are serialized.
    pub async fn save_settings(&self, settings: UserSettings) -> Result<(), ApiError> {
        let _guard = self.settings_lock.lock().await;
        let store = self.settings.clone();
        tokio::task::spawn_blocking(move || store.save(&settings))
            .await
            .map_err(|err| ApiError::Internal(format!("Failed to save settings: {err}")))??;
        Ok(())
    }

    /// Client for the listing endpoints, or `None` when the integration is
    /// off or no credentials are available.
    pub async fn listing_client(&self) -> Result<Option<PaperlessClient>, ApiError> {
        if !self.paperless_enabled() {
            return Ok(None);
        }
        let saved = self.load_settings().await?;
        match self.resolve_credentials(&saved, None, None) {
            Ok(creds) => PaperlessClient::new(&creds.url, &creds.token)
                .map(Some)
                .map_err(ApiError::upstream("Failed to create Paperless client")),
            Err(_) => Ok(None),
        }
    }
}

fn first_non_blank<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}
