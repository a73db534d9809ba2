// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User settings endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use docuscan_core::UserSettings;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /api/settings - current settings, including the stored token
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(state.load_settings().await?))
}

/// POST /api/settings - replace the stored settings
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(settings): ApiJson<UserSettings>,
) -> Result<Json<SaveSettingsResponse>, ApiError> {
    state.save_settings(settings).await?;
    info!(path = %state.settings.path().display(), "settings updated");

    Ok(Json(SaveSettingsResponse {
        success: true,
        message: "Settings saved successfully",
    }))
}
