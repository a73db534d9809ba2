// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF endpoints: compose images into a downloadable PDF, estimate size.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docuscan_core::DocuscanError;
use docuscan_document::estimate::DEFAULT_ESTIMATE_QUALITY;
use docuscan_document::{ComposeOutcome, PageCompositor, estimate_pdf_size};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

const DEFAULT_TITLE: &str = "Scanned Document";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_estimate_quality() -> u32 {
    DEFAULT_ESTIMATE_QUALITY.into()
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub images: Vec<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub compression_quality: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub num_pages: u64,
    #[serde(default = "default_estimate_quality")]
    pub compression_quality: u32,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub estimated_size_bytes: u64,
    pub estimated_size_mb: f64,
    pub num_pages: u64,
    pub compression_quality: u32,
}

/// Bytes to megabytes, rounded to two decimals.
pub(crate) fn megabytes(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Compose on the blocking pool. Rejects an empty image list up front.
#[instrument(skip(state, images), fields(images = images.len()))]
pub(crate) async fn compose(
    state: &AppState,
    images: Vec<String>,
    title: String,
    quality: Option<u32>,
) -> Result<ComposeOutcome, ApiError> {
    if images.is_empty() {
        return Err(DocuscanError::NoImages.into());
    }
    let compositor = PageCompositor::new(state.compose_options(quality));
    tokio::task::spawn_blocking(move || compositor.compose(images.as_slice(), &title))
        .await
        .map_err(|err| ApiError::Internal(format!("PDF generation failed: {err}")))?
        .map_err(ApiError::from)
}

/// Comma-joined indices of skipped inputs.
pub(crate) fn skipped_indices(outcome: &ComposeOutcome) -> String {
    outcome
        .skipped
        .iter()
        .map(|s| s.index.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// POST /api/pdf/generate
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<GenerateRequest>,
) -> Result<Response, ApiError> {
    let disposition = content_disposition(&request.title);
    let outcome = compose(&state, request.images, request.title, request.compression_quality).await?;

    let size = outcome.pdf.len();
    let skipped = HeaderValue::from_str(&skipped_indices(&outcome))
        .unwrap_or_else(|_| HeaderValue::from_static(""));
    info!(bytes = size, pages = outcome.page_count, skipped = outcome.skipped.len(), "PDF generated");

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (header::CONTENT_DISPOSITION, disposition),
        (header::CONTENT_LENGTH, HeaderValue::from(size)),
        (HeaderName::from_static("x-file-size"), HeaderValue::from(size)),
        (HeaderName::from_static("x-page-count"), HeaderValue::from(outcome.page_count)),
        (HeaderName::from_static("x-skipped-images"), skipped),
    ];
    Ok((headers, outcome.pdf).into_response())
}

/// `attachment; filename="<title>.pdf"`. UTF-8 titles go out as raw bytes;
/// titles with control characters fall back to `scan.pdf`.
fn content_disposition(title: &str) -> HeaderValue {
    let value = format!("attachment; filename=\"{}.pdf\"", title.replace('"', "'"));
    HeaderValue::from_bytes(value.as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"scan.pdf\""))
}

/// POST /api/pdf/estimate-size
pub async fn estimate_size_handler(
    ApiJson(request): ApiJson<EstimateRequest>,
) -> Json<EstimateResponse> {
    let quality = request.compression_quality.min(u8::MAX.into()) as u8;
    let estimated = estimate_pdf_size(request.num_pages, quality);
    Json(EstimateResponse {
        estimated_size_bytes: estimated,
        estimated_size_mb: megabytes(estimated),
        num_pages: request.num_pages,
        compression_quality: request.compression_quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes_round_to_two_places() {
        assert_eq!(megabytes(1_210_000), 1.15);
        assert_eq!(megabytes(0), 0.0);
        assert_eq!(megabytes(1024 * 1024), 1.0);
    }

    #[test]
    fn disposition_quotes_the_title() {
        assert_eq!(
            content_disposition("Invoice \"Q3\""),
            "attachment; filename=\"Invoice 'Q3'.pdf\""
        );
        assert_eq!(
            content_disposition("bad\nname"),
            "attachment; filename=\"scan.pdf\""
        );
    }
}
