//! Integration tests for the API service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lexcheck_api::handlers::{create_router, AppState, ErrorResponse};
use lexcheck_api::views::{
    DeleteResponse, ExtractResponse, HealthResponse, ReverifyResponse, StatutePage, StatuteView,
};
use lexcheck_extractor::{Extractor, ExtractorConfig};
use lexcheck_store::SqliteStore;
use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const COMPLAINT: &str = "The policy violates 42 U.S.C. § 2000e-2 and 29 C.F.R. § 1604.11 \
                         and was enacted by Pub. L. No. 88-352, 78 Stat. 241.";

/// Helper to create test application state
fn create_test_state(source: MockSource) -> AppState<MockSource> {
    let store = SqliteStore::new(":memory:").unwrap();
    let config = ClientConfig {
        base_backoff_ms: 1,
        max_backoff_ms: 4,
        ..Default::default()
    };
    let client = VerificationClient::new(source, config).unwrap();
    let extractor = Extractor::new(client, store, ExtractorConfig::default()).unwrap();
    AppState::new(Arc::new(extractor))
}

async fn send<T: DeserializeOwned>(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, T) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn extract(app: &Router, document: i64, text: &str) -> ExtractResponse {
    let body = serde_json::json!({ "text": text, "label": "complaint.txt" }).to_string();
    let (status, response) = send(
        app,
        "POST",
        &format!("/api/documents/{}/extract", document),
        Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    response
}

fn is_rfc3339_utc(value: &str) -> bool {
    value.len() == 20 && value.ends_with('Z') && value.as_bytes()[10] == b'T'
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state(MockSource::new()));

    let (status, health): (_, HealthResponse) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.statutes, 0);
}

#[tokio::test]
async fn test_extract_registers_document_and_verifies() {
    let source = MockSource::new();
    source.respond("29 C.F.R. § 1604.11", false);
    let app = create_router(create_test_state(source));

    let response = extract(&app, 3, COMPLAINT).await;

    assert_eq!(response.document_id, 3);
    assert_eq!(response.summary.total, 4);
    assert_eq!(response.summary.current, 3);
    assert_eq!(response.summary.outdated, 1);
    assert_eq!(response.summary.created, 4);
    assert!(response.failures.is_empty());
    assert!(!response.pass_id.is_empty());

    let cfr = response
        .statutes
        .iter()
        .find(|s| s.reference == "29 C.F.R. § 1604.11")
        .unwrap();
    assert_eq!(cfr.status, "outdated");
    assert_eq!(cfr.is_current, Some(false));
    assert_eq!(cfr.jurisdiction, "cfr");
    assert!(cfr.excerpt.contains("**29 C.F.R. § 1604.11**"));
    assert!(is_rfc3339_utc(cfr.verified_at.as_deref().unwrap()));
    assert!(is_rfc3339_utc(&cfr.created_at));
}

#[tokio::test]
async fn test_list_statutes_paginated() {
    let app = create_router(create_test_state(MockSource::new()));
    extract(&app, 1, COMPLAINT).await;

    let (status, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?page=1&per_page=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.pagination.total, 4);
    assert_eq!(page.pagination.pages, 2);

    let (_, second): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?page=2&per_page=3", None).await;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.pagination.page, 2);

    // Ordered by reference across pages
    let mut references: Vec<_> = page.items.iter().map(|s| s.reference.clone()).collect();
    references.extend(second.items.iter().map(|s| s.reference.clone()));
    let mut sorted = references.clone();
    sorted.sort();
    assert_eq!(references, sorted);
}

#[tokio::test]
async fn test_list_defaults_and_clamps_page_size() {
    let app = create_router(create_test_state(MockSource::new()));
    extract(&app, 1, COMPLAINT).await;

    let (_, page): (_, StatutePage) = send(&app, "GET", "/api/statutes", None).await;
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.per_page, 20);

    let (_, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?per_page=1000", None).await;
    assert_eq!(page.pagination.per_page, 100);
}

#[tokio::test]
async fn test_list_huge_page_is_empty() {
    let app = create_router(create_test_state(MockSource::new()));
    extract(&app, 1, COMPLAINT).await;

    let uri = format!("/api/statutes?page={}&per_page=100", usize::MAX);
    let (status, page): (_, StatutePage) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.page, usize::MAX);
    assert_eq!(page.pagination.total, 4);

    let uri = format!("/api/statutes/outdated?page={}", usize::MAX);
    let (status, page): (_, StatutePage) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_filters() {
    let source = MockSource::new();
    source.respond("78 Stat. 241", false);
    let app = create_router(create_test_state(source));
    extract(&app, 1, COMPLAINT).await;
    extract(&app, 2, "See 42 U.S.C. § 1983.").await;

    let (_, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?document_id=2", None).await;
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].reference, "42 U.S.C. § 1983");

    let (_, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?status=current", None).await;
    assert_eq!(page.pagination.total, 4);

    let (_, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?is_current=false", None).await;
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].reference, "78 Stat. 241");
}

#[tokio::test]
async fn test_list_outdated() {
    let source = MockSource::new();
    source.respond("29 C.F.R. § 1604.11", false);
    source.respond("78 Stat. 241", false);
    let app = create_router(create_test_state(source));
    extract(&app, 1, COMPLAINT).await;

    let (status, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes/outdated", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.pagination.total, 2);
    assert!(page.items.iter().all(|s| s.status == "outdated"));
}

#[tokio::test]
async fn test_get_statute() {
    let app = create_router(create_test_state(MockSource::new()));
    let response = extract(&app, 1, "See 42 U.S.C. § 1983.").await;
    let id = response.statutes[0].id;

    let (status, statute): (_, StatuteView) =
        send(&app, "GET", &format!("/api/statutes/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(statute.id, id);
    assert_eq!(statute.reference, "42 U.S.C. § 1983");
    assert_eq!(statute.status, "current");
}

#[tokio::test]
async fn test_reverify_statute_bypasses_cache() {
    let source = MockSource::new();
    let app = create_router(create_test_state(source.clone()));
    let response = extract(&app, 1, "See 42 U.S.C. § 1983.").await;
    let id = response.statutes[0].id;

    // Repealed since the pass
    source.respond("42 U.S.C. § 1983", false);

    let (status, reverify): (_, ReverifyResponse) =
        send(&app, "PUT", &format!("/api/statutes/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reverify.outcome, "verified");
    let statute = reverify.statute.unwrap();
    assert_eq!(statute.status, "outdated");
    assert_eq!(statute.is_current, Some(false));
    assert_eq!(source.calls_for("42 U.S.C. § 1983"), 2);
}

#[tokio::test]
async fn test_failed_reverify_keeps_status() {
    let source = MockSource::new();
    let app = create_router(create_test_state(source.clone()));
    let response = extract(&app, 1, "See 42 U.S.C. § 1983.").await;
    let id = response.statutes[0].id;

    source.fail(
        "42 U.S.C. § 1983",
        lexcheck_verify::VerifyError::Transient("timeout".to_string()),
    );

    let (status, reverify): (_, ReverifyResponse) =
        send(&app, "PUT", &format!("/api/statutes/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reverify.outcome, "failed");
    let statute = reverify.statute.unwrap();
    assert_eq!(statute.status, "current");
    assert!(statute.last_error.is_some());
    assert!(is_rfc3339_utc(statute.last_checked_at.as_deref().unwrap()));
}

#[tokio::test]
async fn test_delete_document() {
    let app = create_router(create_test_state(MockSource::new()));
    extract(&app, 5, COMPLAINT).await;

    let (status, deleted): (_, DeleteResponse) =
        send(&app, "DELETE", "/api/documents/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, DeleteResponse { document_id: 5, removed: 4 });

    let (_, page): (_, StatutePage) =
        send(&app, "GET", "/api/statutes?document_id=5", None).await;
    assert_eq!(page.pagination.total, 0);

    let (status, error): (_, ErrorResponse) =
        send(&app, "DELETE", "/api/documents/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error.error.contains("5"));
}

#[tokio::test]
async fn test_unknown_statute_returns_json_404() {
    let app = create_router(create_test_state(MockSource::new()));

    let (status, error): (_, ErrorResponse) =
        send(&app, "GET", "/api/statutes/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error.error.contains("999"));

    let (status, _): (_, ErrorResponse) = send(&app, "PUT", "/api/statutes/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_requests_return_json_400() {
    let app = create_router(create_test_state(MockSource::new()));

    let (status, _): (_, ErrorResponse) =
        send(&app, "GET", "/api/statutes?status=pending", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _): (_, ErrorResponse) =
        send(&app, "GET", "/api/statutes?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _): (_, ErrorResponse) = send(
        &app,
        "POST",
        "/api/documents/1/extract",
        Some(r#"{"label": "no text"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_extract_text_too_long() {
    let store = SqliteStore::new(":memory:").unwrap();
    let client = VerificationClient::new(MockSource::new(), ClientConfig::default()).unwrap();
    let config = ExtractorConfig {
        max_text_length: 16,
        ..Default::default()
    };
    let extractor = Extractor::new(client, store, config).unwrap();
    let app = create_router(AppState::new(Arc::new(extractor)));

    let body = serde_json::json!({ "text": COMPLAINT }).to_string();
    let (status, error): (_, ErrorResponse) =
        send(&app, "POST", "/api/documents/1/extract", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error.error.contains("too long"));
}
