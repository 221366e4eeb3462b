//! HttpStatuteSource against a local legal database stand-in

use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lexcheck_domain::{CanonicalReference, Jurisdiction};
use lexcheck_verify::http::{CFR_SOURCE, SEARCH_SOURCE, US_CODE_SOURCE};
use lexcheck_verify::{
    ClientConfig, HttpStatuteSource, SourceConfig, StatuteSource, VerificationClient, VerifyError,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const API_KEY: &str = "secret-key";

async fn uscode_section(
    Path((_title, section)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    match section.as_str() {
        "1983" => Json(json!({ "is_current": true, "as_of": "2024-01-02T03:04:05Z" })).into_response(),
        "1" => Json(json!({ "is_current": false })).into_response(),
        "404" => StatusCode::NOT_FOUND.into_response(),
        "400" => StatusCode::BAD_REQUEST.into_response(),
        "403" => StatusCode::FORBIDDEN.into_response(),
        "429" => (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "7")]).into_response(),
        "429-date" => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "Tue, 02 Jan 2024 03:04:05 GMT")],
        )
            .into_response(),
        "500" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "bad" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "missing" => Json(json!({ "status": "ok" })).into_response(),
        "typed" => Json(json!({ "is_current": "yes" })).into_response(),
        "auth" => {
            let expected = format!("Bearer {}", API_KEY);
            let authorized = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(expected.as_str());
            if authorized {
                Json(json!({ "is_current": true })).into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn cfr_section(Path((_title, _section)): Path<(String, String)>) -> Response {
    Json(json!({ "is_current": false })).into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("fields").map(String::as_str) != Some("reference,status") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let q = params.get("q").cloned().unwrap_or_default();
    let results = match q.as_str() {
        "Pub. L. No. 88-352" => json!([{ "reference": q, "status": "current" }]),
        "78 Stat. 241" => json!([{ "reference": q, "status": "repealed" }]),
        _ => json!([]),
    };
    Json(json!({ "results": results })).into_response()
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn legal_database() -> String {
    let router = Router::new()
        .route("/uscode/v1/titles/:title/sections/:section", get(uscode_section))
        .route("/cfr/v1/titles/:title/sections/:section", get(cfr_section))
        .route("/search/v1/statutes", get(search));
    spawn_server(router).await
}

async fn source() -> HttpStatuteSource {
    let base = legal_database().await;
    HttpStatuteSource::new(SourceConfig::new(base).with_api_key(API_KEY)).unwrap()
}

fn usc(section: &str) -> CanonicalReference {
    CanonicalReference::from_canonical(format!("42 U.S.C. § {}", section), Jurisdiction::UsCode)
}

#[tokio::test]
async fn test_us_code_current() {
    let source = source().await;
    let result = source.lookup(&usc("1983")).await.unwrap();

    assert!(result.is_current);
    assert_eq!(result.source_database, US_CODE_SOURCE);
    assert_eq!(result.as_of, 1_704_164_645);
    // The lookup time is recorded separately from the reported currency date
    assert!(result.checked_at > result.as_of);
}

#[tokio::test]
async fn test_us_code_outdated() {
    let source = source().await;
    let result = source.lookup(&usc("1")).await.unwrap();
    assert!(!result.is_current);
}

#[tokio::test]
async fn test_cfr_route() {
    let source = source().await;
    let cfr = CanonicalReference::from_canonical("29 C.F.R. § 1604.11", Jurisdiction::Cfr);
    let result = source.lookup(&cfr).await.unwrap();

    assert!(!result.is_current);
    assert_eq!(result.source_database, CFR_SOURCE);
}

#[tokio::test]
async fn test_search_route() {
    let source = source().await;

    let law = CanonicalReference::from_canonical("Pub. L. No. 88-352", Jurisdiction::PublicLaw);
    let result = source.lookup(&law).await.unwrap();
    assert!(result.is_current);
    assert_eq!(result.source_database, SEARCH_SOURCE);

    let stat = CanonicalReference::from_canonical("78 Stat. 241", Jurisdiction::StatutesAtLarge);
    assert!(!source.lookup(&stat).await.unwrap().is_current);

    let unknown = CanonicalReference::from_canonical("CAL CIV CODE § 1714", Jurisdiction::StateCode);
    assert!(matches!(
        source.lookup(&unknown).await,
        Err(VerifyError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_status_classification() {
    let source = source().await;

    assert!(matches!(
        source.lookup(&usc("404")).await,
        Err(VerifyError::NotFound(_))
    ));
    assert!(matches!(
        source.lookup(&usc("400")).await,
        Err(VerifyError::NotFound(_))
    ));
    assert!(matches!(
        source.lookup(&usc("403")).await,
        Err(VerifyError::Transient(_))
    ));
    assert!(matches!(
        source.lookup(&usc("500")).await,
        Err(VerifyError::Transient(_))
    ));
    assert_eq!(
        source.lookup(&usc("429")).await,
        Err(VerifyError::RateLimited {
            retry_after: Some(Duration::from_secs(7))
        })
    );
    assert_eq!(
        source.lookup(&usc("429-date")).await,
        Err(VerifyError::RateLimited {
            retry_after: Some(Duration::ZERO)
        })
    );
}

#[tokio::test]
async fn test_malformed_responses_are_transient() {
    let source = source().await;

    for section in ["bad", "missing", "typed"] {
        let result = source.lookup(&usc(section)).await;
        assert!(
            matches!(result, Err(VerifyError::Transient(_))),
            "{} should be transient, got {:?}",
            section,
            result
        );
    }
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let base = legal_database().await;

    let with_key = HttpStatuteSource::new(SourceConfig::new(base.clone()).with_api_key(API_KEY)).unwrap();
    assert!(with_key.lookup(&usc("auth")).await.is_ok());

    let without_key = HttpStatuteSource::new(SourceConfig::new(base)).unwrap();
    assert!(matches!(
        without_key.lookup(&usc("auth")).await,
        Err(VerifyError::Transient(_))
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_transient() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpStatuteSource::new(SourceConfig::new(format!("http://{}", addr))).unwrap();
    assert!(matches!(
        source.lookup(&usc("1983")).await,
        Err(VerifyError::Transient(_))
    ));
}

#[tokio::test]
async fn test_client_retries_server_errors() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/uscode/v1/titles/:title/sections/:section",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let base = spawn_server(router).await;

    let source = HttpStatuteSource::new(SourceConfig::new(base)).unwrap();
    let config = ClientConfig {
        max_attempts: 3,
        base_backoff_ms: 1,
        max_backoff_ms: 4,
        ..Default::default()
    };
    let client = VerificationClient::new(source, config).unwrap();

    let result = client.verify(&usc("1983")).await;
    assert!(matches!(result, Err(VerifyError::Transient(_))));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
