// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docuscan-paperless — Thin Paperless-ngx REST client.
//
// Uploads composed PDFs via `post_document`, resolves tag / correspondent /
// document-type names to IDs, lists those entities, and probes connectivity.
// Calls are sequential with fixed timeouts and no retries.

pub mod client;
pub mod error;
pub mod types;

pub use client::PaperlessClient;
pub use error::PaperlessError;
pub use types::{ConnectionState, ConnectionStatus, EntityKind, NamedEntity, UploadReceipt, UploadRequest};
