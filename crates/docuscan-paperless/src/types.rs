// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request and response shapes for the Paperless-ngx REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata collections that can be looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tag,
    Correspondent,
    DocumentType,
}

impl EntityKind {
    /// Collection segment under `/api/`.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Correspondent => "correspondents",
            Self::DocumentType => "document_types",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Correspondent => "correspondent",
            Self::DocumentType => "document type",
        }
    }
}

/// A tag, correspondent, or document type. Fields beyond `id` and `name`
/// (colour, match rules, counts, ...) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a DRF-style list response.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly {
    pub id: i64,
}

/// Everything needed to file one document.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub pdf: Vec<u8>,
    pub title: String,
    /// Tag names; missing ones are created.
    pub tags: Vec<String>,
    /// Correspondent name; looked up, never created.
    pub correspondent: Option<String>,
    /// Document type name; looked up, never created.
    pub document_type: Option<String>,
}

/// Normalized `post_document` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Consumer task id (newer Paperless) or document id; `null` when the
    /// response carried neither.
    pub id: Value,
}

impl UploadReceipt {
    /// Paperless answers either with a bare task-id string or with an
    /// object; fold both into `{id}`.
    pub fn from_response(body: Value) -> Self {
        let id = match body {
            Value::String(_) => body,
            Value::Object(mut map) => map.remove("id").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        Self { id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Error,
    Disabled,
}

/// Outcome of a connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: ConnectionState,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ConnectionStatus {
    pub fn connected(url: impl Into<String>) -> Self {
        Self {
            status: ConnectionState::Connected,
            message: "Successfully connected to Paperless-ngx".to_string(),
            url: Some(url.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionState::Error,
            message: message.into(),
            url: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: ConnectionState::Disabled,
            message: "Paperless-ngx integration is not enabled".to_string(),
            url: None,
        }
    }
}
