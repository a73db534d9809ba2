// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docuscan.

use thiserror::Error;

/// Top-level error type for document and settings operations.
#[derive(Debug, Error)]
pub enum DocuscanError {
    // -- Input errors --
    #[error("no images provided")]
    NoImages,

    #[error("invalid base64 payload: {0}")]
    Base64(String),

    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // -- Document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage / persistence --
    #[error("failed to save settings to {path}: {reason}")]
    SettingsWrite { path: String, reason: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocuscanError {
    /// Whether the error was caused by the caller's input or configuration
    /// rather than by a failure inside the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoImages | Self::Base64(_) | Self::MissingConfig(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocuscanError>;
