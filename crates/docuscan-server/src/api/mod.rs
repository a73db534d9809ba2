// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes. PDF generation and size estimation live under `/api/pdf`,
// Paperless-ngx under `/api/paperless`, user settings under `/api/settings`.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod paperless;
pub mod pdf;
pub mod settings;

/// Build the service router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_size = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .route("/pdf/generate", post(pdf::generate_handler))
        .route("/pdf/estimate-size", post(pdf::estimate_size_handler))
        .route("/paperless/upload", post(paperless::upload_handler))
        .route("/paperless/tags", get(paperless::tags_handler))
        .route("/paperless/correspondents", get(paperless::correspondents_handler))
        .route("/paperless/document-types", get(paperless::document_types_handler))
        .route("/paperless/test-connection", get(paperless::test_connection_handler))
        .route(
            "/settings",
            get(settings::get_settings_handler).post(settings::update_settings_handler),
        );

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Service info ===

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Document Scanner API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "pdf": "/api/pdf",
            "paperless": "/api/paperless",
            "settings": "/api/settings",
            "health": "/health",
        },
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    paperless_enabled: bool,
    version: &'static str,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        paperless_enabled: state.paperless_enabled(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
