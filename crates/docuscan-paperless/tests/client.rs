// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client tests against an in-process stand-in for the Paperless-ngx API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use docuscan_paperless::{ConnectionState, PaperlessClient, PaperlessError, UploadRequest};

const TOKEN: &str = "secret-token";

#[derive(Default)]
struct Recorded {
    auth_headers: Vec<String>,
    tag_lookups: Vec<String>,
    created_tags: Vec<String>,
    upload_fields: Vec<(String, String)>,
}

#[derive(Clone)]
struct Fake {
    base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl Fake {
    fn record_auth(&self, headers: &HeaderMap) -> bool {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let ok = value == format!("Token {TOKEN}");
        self.recorded.lock().unwrap().auth_headers.push(value);
        ok
    }
}

async fn tags(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !fake.record_auth(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some(name) = query.get("name__iexact") {
        fake.recorded.lock().unwrap().tag_lookups.push(name.clone());
        let results = if name.eq_ignore_ascii_case("invoice") {
            json!([{"id": 7, "name": "Invoice"}])
        } else {
            json!([])
        };
        return Json(json!({"count": results.as_array().map_or(0, Vec::len), "next": null, "results": results}))
            .into_response();
    }
    match query.get("page").map(String::as_str) {
        Some("2") => Json(json!({
            "count": 3,
            "next": null,
            "results": [{"id": 9, "name": "Receipts", "color": "#ff0000"}]
        }))
        .into_response(),
        _ => Json(json!({
            "count": 3,
            "next": format!("{}/api/tags/?page=2", fake.base_url),
            "results": [{"id": 7, "name": "Invoice"}, {"id": 8, "name": "Mobile"}]
        }))
        .into_response(),
    }
}

async fn create_tag(State(fake): State<Fake>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !fake.record_auth(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut recorded = fake.recorded.lock().unwrap();
    recorded.created_tags.push(name.clone());
    let id = 100 + recorded.created_tags.len() as i64;
    (StatusCode::CREATED, Json(json!({"id": id, "name": name}))).into_response()
}

async fn correspondents(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let results = match query.get("name__iexact") {
        Some(name) if name.eq_ignore_ascii_case("acme") => json!([{"id": 3, "name": "ACME"}]),
        Some(_) => json!([]),
        None => json!([{"id": 3, "name": "ACME"}]),
    };
    Json(json!({"next": null, "results": results}))
}

async fn document_types() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response()
}

async fn post_document(State(fake): State<Fake>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !fake.record_auth(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.unwrap();
                format!("{file_name};{content_type};{}", String::from_utf8_lossy(&data))
            }
            None => field.text().await.unwrap(),
        };
        fields.push((name, value));
    }
    let title = fields
        .iter()
        .find(|(k, _)| k == "title")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    fake.recorded.lock().unwrap().upload_fields = fields;

    match title.as_str() {
        "object" => Json(json!({"id": 99, "status": "ok"})).into_response(),
        "fail" => (StatusCode::BAD_REQUEST, "bad document").into_response(),
        _ => Json(json!("3f1c-task-id")).into_response(),
    }
}

async fn documents(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    if !fake.record_auth(&headers) {
        return (StatusCode::UNAUTHORIZED, "Invalid token.").into_response();
    }
    Json(json!({"count": 0, "next": null, "results": []})).into_response()
}

async fn spawn_fake() -> Fake {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let fake = Fake {
        base_url: format!("http://{}", listener.local_addr().unwrap()),
        recorded: Arc::default(),
    };
    let app = Router::new()
        .route("/api/tags/", get(tags).post(create_tag))
        .route("/api/correspondents/", get(correspondents))
        .route("/api/document_types/", get(document_types))
        .route("/api/documents/", get(documents))
        .route("/api/documents/post_document/", post(post_document))
        .with_state(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    fake
}

fn fields_named<'a>(fields: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

#[tokio::test]
async fn upload_resolves_metadata_and_posts_multipart() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&format!("{}/", fake.base_url), TOKEN).unwrap();

    let receipt = client
        .upload(UploadRequest {
            pdf: b"%PDF-1.5 fake".to_vec(),
            title: "Scan 1".into(),
            tags: vec!["invoice".into(), " Tax 2024 ".into(), "".into()],
            correspondent: Some("acme".into()),
            document_type: Some("Letter".into()),
        })
        .await
        .unwrap();

    assert_eq!(receipt.id, json!("3f1c-task-id"));

    let recorded = fake.recorded.lock().unwrap();
    assert_eq!(recorded.tag_lookups, vec!["invoice", "Tax 2024"]);
    assert_eq!(recorded.created_tags, vec!["Tax 2024"]);
    assert!(recorded.auth_headers.iter().all(|h| h == "Token secret-token"));

    let fields = &recorded.upload_fields;
    assert_eq!(fields_named(fields, "document"), vec!["scan.pdf;application/pdf;%PDF-1.5 fake"]);
    assert_eq!(fields_named(fields, "title"), vec!["Scan 1"]);
    assert_eq!(fields_named(fields, "tags"), vec!["7", "101"]);
    assert_eq!(fields_named(fields, "correspondent"), vec!["3"]);
    // The document-type lookup failed upstream, so the field is omitted.
    assert!(fields_named(fields, "document_type").is_empty());
}

#[tokio::test]
async fn unknown_correspondent_is_omitted_not_created() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&fake.base_url, TOKEN).unwrap();

    client
        .upload(UploadRequest {
            pdf: b"%PDF".to_vec(),
            title: "No match".into(),
            correspondent: Some("Nobody".into()),
            ..UploadRequest::default()
        })
        .await
        .unwrap();

    let recorded = fake.recorded.lock().unwrap();
    assert!(fields_named(&recorded.upload_fields, "correspondent").is_empty());
    assert!(fields_named(&recorded.upload_fields, "tags").is_empty());
}

#[tokio::test]
async fn object_response_is_normalized() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&fake.base_url, TOKEN).unwrap();

    let receipt = client
        .upload(UploadRequest {
            pdf: b"%PDF".to_vec(),
            title: "object".into(),
            ..UploadRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(receipt.id, json!(99));
}

#[tokio::test]
async fn rejected_upload_surfaces_status_and_body() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&fake.base_url, TOKEN).unwrap();

    let err = client
        .upload(UploadRequest {
            pdf: b"%PDF".to_vec(),
            title: "fail".into(),
            ..UploadRequest::default()
        })
        .await
        .unwrap_err();

    match err {
        PaperlessError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad document");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn listing_follows_next_links() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&fake.base_url, TOKEN).unwrap();

    let tags = client.tags().await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Invoice", "Mobile", "Receipts"]);
    assert_eq!(tags[2].extra["color"], "#ff0000");

    let correspondents = client.correspondents().await.unwrap();
    assert_eq!(correspondents.len(), 1);
}

#[tokio::test]
async fn listing_error_is_reported() {
    let fake = spawn_fake().await;
    let client = PaperlessClient::new(&fake.base_url, TOKEN).unwrap();

    let err = client.document_types().await.unwrap_err();
    assert!(matches!(err, PaperlessError::Api { status: 500, .. }));
}

#[tokio::test]
async fn connection_test_reports_connected_and_bad_token() {
    let fake = spawn_fake().await;

    let ok = PaperlessClient::new(&fake.base_url, TOKEN)
        .unwrap()
        .test_connection()
        .await;
    assert_eq!(ok.status, ConnectionState::Connected);
    assert_eq!(ok.url.as_deref(), Some(fake.base_url.as_str()));

    let bad = PaperlessClient::new(&fake.base_url, "wrong")
        .unwrap()
        .test_connection()
        .await;
    assert_eq!(bad.status, ConnectionState::Error);
    assert!(bad.message.contains("401"), "{}", bad.message);
}

#[tokio::test]
async fn unreachable_server_is_an_error_status() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let status = PaperlessClient::new(&format!("http://{addr}"), TOKEN)
        .unwrap()
        .test_connection()
        .await;
    assert_eq!(status.status, ConnectionState::Error);
    assert!(status.message.starts_with("Failed to connect to Paperless-ngx"));
}

#[tokio::test]
async fn foreign_next_link_never_receives_the_token() {
    // A second server standing in for whatever host a spoofed `next` names.
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let foreign_seen = seen.clone();
    let foreign = Router::new().fallback(move |headers: HeaderMap| {
        let seen = foreign_seen.clone();
        async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            seen.lock().unwrap().push(auth);
            Json(json!({"next": null, "results": [{"id": 666, "name": "Stolen"}]}))
        }
    });
    let foreign_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let foreign_url = format!("http://{}", foreign_listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(foreign_listener, foreign).await.unwrap();
    });

    let next = format!("{foreign_url}/steal?page=2");
    let paperless = Router::new().route(
        "/api/tags/",
        get(move |Query(query): Query<HashMap<String, String>>| {
            let next = next.clone();
            async move {
                match query.get("page").map(String::as_str) {
                    Some("2") => Json(json!({"next": null, "results": [{"id": 2, "name": "Second"}]})),
                    _ => Json(json!({"next": next, "results": [{"id": 1, "name": "First"}]})),
                }
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, paperless).await.unwrap();
    });

    let tags = PaperlessClient::new(&base_url, TOKEN)
        .unwrap()
        .tags()
        .await
        .unwrap();

    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert!(seen.lock().unwrap().is_empty(), "foreign host was called");
}
