// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP client for a Paperless-ngx instance.
//
// Every request carries `Authorization: Token <token>`. Calls are made one at
// a time with fixed per-call timeouts; nothing is retried.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::error::{PaperlessError, Result};
use crate::types::{ConnectionStatus, EntityKind, IdOnly, NamedEntity, Page, UploadReceipt, UploadRequest};

pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const LIST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Name lookups and tag creation run inside an upload and share its budget.
pub const LOOKUP_TIMEOUT: Duration = UPLOAD_TIMEOUT;

const USER_AGENT: &str = concat!("docuscan/", env!("CARGO_PKG_VERSION"));
const UPLOAD_FILE_NAME: &str = "scan.pdf";
/// Upper bound on followed `next` links for one listing.
const MAX_LIST_PAGES: usize = 100;

/// Client bound to one Paperless base URL and API token.
#[derive(Debug, Clone)]
pub struct PaperlessClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PaperlessClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .timeout(timeout)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    // -- Name resolution ------------------------------------------------------

    /// Case-insensitive exact-name lookup. `Ok(None)` when nothing matches.
    #[instrument(skip(self), fields(kind = kind.label()))]
    pub async fn find_id(&self, kind: EntityKind, name: &str) -> Result<Option<i64>> {
        let url = format!(
            "{}/?name__iexact={}",
            self.endpoint(kind.path()),
            urlencoding::encode(name)
        );
        let page: Page<IdOnly> = self.get_json(&url, LOOKUP_TIMEOUT).await?;
        Ok(page.results.first().map(|entity| entity.id))
    }

    /// Create a tag and return its ID.
    #[instrument(skip(self))]
    pub async fn create_tag(&self, name: &str) -> Result<i64> {
        let response = self
            .client
            .post(format!("{}/", self.endpoint(EntityKind::Tag.path())))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .timeout(LOOKUP_TIMEOUT)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        let created: IdOnly = check_status(response).await?.json().await?;
        info!(id = created.id, "created tag");
        Ok(created.id)
    }

    /// Get-or-create a tag. Failures are logged and the tag is dropped.
    pub async fn tag_id(&self, name: &str) -> Option<i64> {
        let found = match self.find_id(EntityKind::Tag, name).await {
            Ok(found) => found,
            Err(err) => {
                warn!(tag = name, error = %err, "tag lookup failed");
                return None;
            }
        };
        if found.is_some() {
            return found;
        }
        match self.create_tag(name).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(tag = name, error = %err, "tag creation failed");
                None
            }
        }
    }

    /// Lookup only. Failures are logged and resolve to `None`.
    pub async fn existing_id(&self, kind: EntityKind, name: &str) -> Option<i64> {
        match self.find_id(kind, name).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                debug!(kind = kind.label(), name, "no match; field omitted");
                None
            }
            Err(err) => {
                warn!(kind = kind.label(), name, error = %err, "lookup failed");
                None
            }
        }
    }

    // -- Upload ---------------------------------------------------------------

    /// Resolve metadata names, then post the PDF to the consumer.
    #[instrument(skip_all, fields(title = %request.title, bytes = request.pdf.len()))]
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt> {
        let mut tag_ids = Vec::with_capacity(request.tags.len());
        for name in request.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some(id) = self.tag_id(name).await {
                tag_ids.push(id);
            }
        }
        let correspondent = match request.correspondent.as_deref() {
            Some(name) if !name.trim().is_empty() => {
                self.existing_id(EntityKind::Correspondent, name.trim()).await
            }
            _ => None,
        };
        let document_type = match request.document_type.as_deref() {
            Some(name) if !name.trim().is_empty() => {
                self.existing_id(EntityKind::DocumentType, name.trim()).await
            }
            _ => None,
        };

        let document = Part::bytes(request.pdf)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("application/pdf")?;
        let mut form = Form::new()
            .part("document", document)
            .text("title", request.title);
        for id in &tag_ids {
            form = form.text("tags", id.to_string());
        }
        if let Some(id) = correspondent {
            form = form.text("correspondent", id.to_string());
        }
        if let Some(id) = document_type {
            form = form.text("document_type", id.to_string());
        }

        let response = self
            .client
            .post(self.endpoint("documents/post_document/"))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| PaperlessError::InvalidResponse(err.to_string()))?;

        let receipt = UploadReceipt::from_response(body);
        info!(id = %receipt.id, tags = tag_ids.len(), "document accepted by Paperless");
        Ok(receipt)
    }

    // -- Listings -------------------------------------------------------------

    pub async fn tags(&self) -> Result<Vec<NamedEntity>> {
        self.list(EntityKind::Tag).await
    }

    pub async fn correspondents(&self) -> Result<Vec<NamedEntity>> {
        self.list(EntityKind::Correspondent).await
    }

    pub async fn document_types(&self) -> Result<Vec<NamedEntity>> {
        self.list(EntityKind::DocumentType).await
    }

    /// Every entity of `kind`, following `next` links.
    #[instrument(skip(self), fields(kind = kind.label()))]
    pub async fn list(&self, kind: EntityKind) -> Result<Vec<NamedEntity>> {
        let mut url = format!("{}/", self.endpoint(kind.path()));
        let mut entities = Vec::new();
        for _ in 0..MAX_LIST_PAGES {
            let page: Page<NamedEntity> = self.get_json(&url, LIST_TIMEOUT).await?;
            entities.extend(page.results);
            match page.next.and_then(|next| self.next_page_url(kind, &next)) {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }
        debug!(count = entities.len(), "listing complete");
        Ok(entities)
    }

    /// Where to fetch the page a `next` link points at. Links under the
    /// configured base URL are followed as-is. For any other origin only the
    /// query is kept and re-rooted on the collection endpoint, so the token
    /// never leaves the configured host.
    fn next_page_url(&self, kind: EntityKind, next: &str) -> Option<String> {
        if next.starts_with(&format!("{}/", self.base_url)) {
            return Some(next.to_string());
        }
        let query = Url::parse(next).ok()?.query()?.to_string();
        warn!(next, "next link points outside the configured URL; re-rooting");
        Some(format!("{}/?{}", self.endpoint(kind.path()), query))
    }

    // -- Health ---------------------------------------------------------------

    /// Probe the documents endpoint. Never fails; errors become a status.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn test_connection(&self) -> ConnectionStatus {
        let result = async {
            let response = self
                .client
                .get(self.endpoint("documents/"))
                .header(reqwest::header::AUTHORIZATION, self.authorization())
                .timeout(CONNECTION_TEST_TIMEOUT)
                .send()
                .await?;
            check_status(response).await
        }
        .await;

        match result {
            Ok(_) => ConnectionStatus::connected(self.base_url.clone()),
            Err(err) => {
                warn!(error = %err, "Paperless connection test failed");
                ConnectionStatus::error(format!("Failed to connect to Paperless-ngx: {err}"))
            }
        }
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(PaperlessError::Api {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}
