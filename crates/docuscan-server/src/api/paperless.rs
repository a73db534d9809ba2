// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paperless-ngx endpoints: compose-and-upload, metadata listings, and a
// connection probe.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use docuscan_core::DocuscanError;
use docuscan_paperless::{ConnectionStatus, NamedEntity, PaperlessClient, UploadRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::pdf::{compose, megabytes};
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadDocumentRequest {
    pub images: Vec<String>,
    pub title: String,
    /// Falls back to the saved default tags when absent.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub correspondent: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub compression_quality: Option<u32>,
    #[serde(default)]
    pub paperless_url: Option<String>,
    #[serde(default)]
    pub paperless_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentResponse {
    pub success: bool,
    pub message: &'static str,
    pub document_id: Value,
    pub file_size_bytes: usize,
    pub file_size_mb: f64,
    pub page_count: usize,
    pub skipped_images: Vec<usize>,
}

/// POST /api/paperless/upload
#[instrument(skip_all, fields(title = %request.title, images = request.images.len()))]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<UploadDocumentRequest>,
) -> Result<Json<UploadDocumentResponse>, ApiError> {
    if request.images.is_empty() {
        return Err(DocuscanError::NoImages.into());
    }

    let saved = state.load_settings().await?;
    let creds = state.resolve_credentials(
        &saved,
        request.paperless_url.as_deref(),
        request.paperless_token.as_deref(),
    )?;
    let tags = request.tags.unwrap_or_else(|| saved.default_tags());

    let outcome = compose(
        &state,
        request.images,
        request.title.clone(),
        request.compression_quality,
    )
    .await?;
    let file_size_bytes = outcome.pdf.len();

    let client = PaperlessClient::new(&creds.url, &creds.token)
        .map_err(ApiError::upstream("Upload failed"))?;
    let receipt = client
        .upload(UploadRequest {
            pdf: outcome.pdf,
            title: request.title,
            tags,
            correspondent: request.correspondent,
            document_type: request.document_type,
        })
        .await
        .map_err(ApiError::upstream("Upload failed"))?;

    info!(document_id = %receipt.id, bytes = file_size_bytes, "uploaded to Paperless");
    Ok(Json(UploadDocumentResponse {
        success: true,
        message: "Document uploaded successfully to Paperless-ngx",
        document_id: receipt.id,
        file_size_bytes,
        file_size_mb: megabytes(file_size_bytes as u64),
        page_count: outcome.page_count,
        skipped_images: outcome.skipped.iter().map(|s| s.index).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<NamedEntity>,
}

#[derive(Debug, Serialize)]
pub struct CorrespondentsResponse {
    pub correspondents: Vec<NamedEntity>,
}

#[derive(Debug, Serialize)]
pub struct DocumentTypesResponse {
    pub document_types: Vec<NamedEntity>,
}

/// GET /api/paperless/tags
pub async fn tags_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TagsResponse>, ApiError> {
    let tags = match state.listing_client().await? {
        Some(client) => client
            .tags()
            .await
            .map_err(ApiError::upstream("Failed to fetch tags"))?,
        None => Vec::new(),
    };
    Ok(Json(TagsResponse { tags }))
}

/// GET /api/paperless/correspondents
pub async fn correspondents_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CorrespondentsResponse>, ApiError> {
    let correspondents = match state.listing_client().await? {
        Some(client) => client
            .correspondents()
            .await
            .map_err(ApiError::upstream("Failed to fetch correspondents"))?,
        None => Vec::new(),
    };
    Ok(Json(CorrespondentsResponse { correspondents }))
}

/// GET /api/paperless/document-types
pub async fn document_types_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentTypesResponse>, ApiError> {
    let document_types = match state.listing_client().await? {
        Some(client) => client
            .document_types()
            .await
            .map_err(ApiError::upstream("Failed to fetch document types"))?,
        None => Vec::new(),
    };
    Ok(Json(DocumentTypesResponse { document_types }))
}

/// GET /api/paperless/test-connection
pub async fn test_connection_handler(State(state): State<Arc<AppState>>) -> Json<ConnectionStatus> {
    if !state.paperless_enabled() {
        return Json(ConnectionStatus::disabled());
    }
    let saved = match state.load_settings().await {
        Ok(saved) => saved,
        Err(err) => return Json(ConnectionStatus::error(err.to_string())),
    };
    let creds = match state.resolve_credentials(&saved, None, None) {
        Ok(creds) => creds,
        Err(err) => return Json(ConnectionStatus::error(err.to_string())),
    };
    let status = match PaperlessClient::new(&creds.url, &creds.token) {
        Ok(client) => client.test_connection().await,
        Err(err) => ConnectionStatus::error(format!("Failed to connect to Paperless-ngx: {err}")),
    };
    Json(status)
}
