// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP error mapping. Every failure leaves the service as `{"detail": ...}`.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docuscan_core::DocuscanError;
use docuscan_paperless::PaperlessError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: PaperlessError,
    },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap a Paperless failure with what the service was doing, for use
    /// with `map_err`.
    pub fn upstream(context: &'static str) -> impl FnOnce(PaperlessError) -> Self {
        move |source| Self::Upstream { context, source }
    }
}

impl From<DocuscanError> for ApiError {
    fn from(err: DocuscanError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let response = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(response)).into_response()
    }
}

/// `Json` extractor whose rejections are reported as 400 `{"detail"}`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let err: ApiError = DocuscanError::NoImages.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "no images provided");

        let err: ApiError = DocuscanError::MissingConfig("Paperless API token").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err: ApiError = DocuscanError::PdfError("broken xref".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_errors_embed_the_body() {
        let err = ApiError::upstream("Upload failed")(PaperlessError::Api {
            status: 403,
            message: "Forbidden".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Upload failed: Paperless API error (status 403): Forbidden"
        );
    }
}
