//! Router-level API tests against the memory storage backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use carton_api::setup;
use carton_api::state::AppState;
use carton_core::{Config, StorageBackend};

const OWNER: &str = "owner@x.com";
const STRANGER: &str = "stranger@x.com";

const MAX_FILE_SIZE: u64 = 1024 * 1024;

async fn test_app() -> (Arc<AppState>, Router) {
    let config = Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        storage_backend: StorageBackend::Memory,
        local_storage_path: None,
        local_storage_base_url: None,
        max_file_size_bytes: MAX_FILE_SIZE,
    };
    setup::initialize_app(config)
        .await
        .expect("Failed to initialize test app")
}

/// Build a multipart body with one `files` field per entry.
fn multipart_body(files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "carton-test-boundary";
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                boundary, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (
        format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn upload(app: &Router, caller: &str, files: &[(&str, &[u8])]) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(files);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v0/files")
        .header("x-caller-email", caller)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn json_request(
    method: Method,
    uri: &str,
    caller: &str,
    body: Option<Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-caller-email", caller);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn upload_one(app: &Router, caller: &str, name: &str) -> String {
    let (status, json) = upload(app, caller, &[(name, b"content")]).await;
    assert_eq!(status, StatusCode::OK);
    json["outcomes"][0]["record"]["id"]
        .as_str()
        .expect("uploaded record id")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let (_state, app) = test_app().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_upload_requires_caller_identity() {
    let (_state, app) = test_app().await;
    let (content_type, body) = multipart_body(&[("a.txt", b"data")]);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v0/files")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_upload_batch_and_list() {
    let (_state, app) = test_app().await;

    let (status, json) = upload(&app, OWNER, &[("a.txt", b"aaa"), ("b.png", b"bbb")]).await;
    assert_eq!(status, StatusCode::OK);

    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| o["outcome"] == "succeeded"));
    assert_eq!(outcomes[0]["record"]["name"], "a.txt");
    assert_eq!(outcomes[0]["record"]["kind"], "document");
    assert_eq!(outcomes[1]["record"]["kind"], "image");

    let (status, json) = send(
        &app,
        json_request(Method::GET, "/api/v0/files", OWNER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    // a stranger sees nothing
    let (status, json) = send(
        &app,
        json_request(Method::GET, "/api/v0/files", STRANGER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_file_rejected_per_file() {
    let (state, app) = test_app().await;

    let big = vec![0u8; (MAX_FILE_SIZE + 1) as usize];
    let (status, json) = upload(&app, OWNER, &[("ok.txt", b"fine"), ("big.bin", &big)]).await;

    // the batch call itself succeeds; only the oversized file is rejected
    assert_eq!(status, StatusCode::OK);
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes[0]["outcome"], "succeeded");
    assert_eq!(outcomes[1]["outcome"], "rejected");
    assert_eq!(outcomes[1]["reason"], "size_exceeded");

    // nothing pending once the batch has resolved
    assert!(state.coordinator.pending().is_empty());
}

#[tokio::test]
async fn test_rename_authorization() {
    let (_state, app) = test_app().await;
    let id = upload_one(&app, OWNER, "report.pdf").await;

    let (status, json) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v0/files/{}", id),
            OWNER,
            Some(serde_json::json!({ "name": "annual-report" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "annual-report.pdf");

    let (status, json) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v0/files/{}", id),
            STRANGER,
            Some(serde_json::json!({ "name": "sneaky" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_share_and_unshare_flow() {
    let (_state, app) = test_app().await;
    let id = upload_one(&app, OWNER, "shared.txt").await;

    // idempotent add with duplicates in the raw list
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/v0/files/{}/share", id),
            OWNER,
            Some(serde_json::json!({ "emails": "x@y.com, x@y.com, z@w.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["user_emails"],
        serde_json::json!(["x@y.com", "z@w.com"])
    );
    assert_eq!(json["admin_emails"], serde_json::json!([]));

    // a standard collaborator cannot grant admin (or share at all)
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/v0/files/{}/share", id),
            "x@y.com",
            Some(serde_json::json!({ "emails": "w@v.com", "grant_admin": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the collaborator can read details
    let (status, json) = send(
        &app,
        json_request(Method::GET, &format!("/api/v0/files/{}", id), "x@y.com", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "shared.txt");

    // owner removes one collaborator
    let (status, json) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/v0/files/{}/share/x@y.com", id),
            OWNER,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_emails"], serde_json::json!(["z@w.com"]));

    // removed collaborator loses visibility
    let (status, _) = send(
        &app,
        json_request(Method::GET, &format!("/api/v0/files/{}", id), "x@y.com", None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_flow() {
    let (_state, app) = test_app().await;
    let id = upload_one(&app, OWNER, "doomed.txt").await;

    let (status, json) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/v0/files/{}", id), STRANGER, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/v0/files/{}", id), OWNER, None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        json_request(Method::GET, &format!("/api/v0/files/{}", id), OWNER, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_url_handoff() {
    let (_state, app) = test_app().await;
    let id = upload_one(&app, OWNER, "dl.txt").await;

    let (status, json) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/v0/files/{}/download-url", id),
            OWNER,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["url"].as_str().unwrap().contains("files/"));
}

#[tokio::test]
async fn test_openapi_doc_served() {
    let (_state, app) = test_app().await;
    let request = Request::builder()
        .uri("/api-doc/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/v0/files"].is_object());
}
