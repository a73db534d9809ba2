// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for the Paperless-ngx client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaperlessError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Paperless API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response from Paperless: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, PaperlessError>;
