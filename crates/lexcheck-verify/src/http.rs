//! HTTP legal database source
//!
//! Routes each canonical reference to the matching endpoint of the legal
//! database API and validates the JSON answer into a `VerificationResult`.
//!
//! # Endpoints
//!
//! - U.S. Code: `GET {base}/uscode/v1/titles/{title}/sections/{section}`
//! - C.F.R.: `GET {base}/cfr/v1/titles/{title}/sections/{section}`
//! - Everything else: `GET {base}/search/v1/statutes?q={reference}&fields=reference,status`
//!
//! # Examples
//!
//! ```no_run
//! use lexcheck_verify::{HttpStatuteSource, SourceConfig};
//!
//! let config = SourceConfig::new("https://api.law.gov").with_api_key("secret");
//! let source = HttpStatuteSource::new(config).unwrap();
//! ```

use crate::config::SourceConfig;
use crate::source::StatuteSource;
use crate::VerifyError;
use async_trait::async_trait;
use lexcheck_domain::{current_timestamp, CanonicalReference, Jurisdiction, VerificationResult};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Source name reported for U.S. Code lookups
pub const US_CODE_SOURCE: &str = "US Code API";

/// Source name reported for C.F.R. lookups
pub const CFR_SOURCE: &str = "CFR API";

/// Source name reported for search lookups
pub const SEARCH_SOURCE: &str = "General Statute API";

/// Legal database client over HTTP
pub struct HttpStatuteSource {
    config: SourceConfig,
    client: reqwest::Client,
}

/// Response of the section endpoints
#[derive(Deserialize)]
struct SectionResponse {
    is_current: bool,
    #[serde(default)]
    as_of: Option<String>,
}

/// Response of the search endpoint
#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    status: String,
    #[serde(default)]
    as_of: Option<String>,
}

/// Where a reference is looked up
enum Route {
    Section { url: String, source: &'static str },
    Search { url: String },
}

impl HttpStatuteSource {
    /// Create a source from explicit configuration
    pub fn new(config: SourceConfig) -> Result<Self, VerifyError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerifyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The configuration this source was built with
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn route(&self, reference: &CanonicalReference) -> Result<Route, VerifyError> {
        let base = self.config.endpoint();
        let (prefix, source) = match reference.jurisdiction() {
            Jurisdiction::UsCode => ("uscode", US_CODE_SOURCE),
            Jurisdiction::Cfr => ("cfr", CFR_SOURCE),
            _ => {
                return Ok(Route::Search {
                    url: format!("{}/search/v1/statutes", base),
                })
            }
        };

        let (title, section) = reference
            .title_and_section()
            .ok_or_else(|| VerifyError::NotFound(reference.to_string()))?;

        Ok(Route::Section {
            url: format!(
                "{}/{}/v1/titles/{}/sections/{}",
                base, prefix, title, section
            ),
            source,
        })
    }

    async fn fetch(
        &self,
        reference: &CanonicalReference,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, VerifyError> {
        let request = match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| VerifyError::Transient(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| parse_retry_after(v, current_timestamp()));
            debug!("{} answered HTTP {} for {}", self.config.endpoint(), status, reference);
            return Err(classify_status(status, retry_after, reference.as_str()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| VerifyError::Transient(format!("Malformed response: {}", e)))
    }
}

#[async_trait]
impl StatuteSource for HttpStatuteSource {
    async fn lookup(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        match self.route(reference)? {
            Route::Section { url, source } => {
                let body = self.fetch(reference, self.client.get(&url)).await?;
                let parsed: SectionResponse = serde_json::from_value(body)
                    .map_err(|e| VerifyError::Transient(format!("Invalid response: {}", e)))?;

                Ok(VerificationResult {
                    is_current: parsed.is_current,
                    source_database: source.to_string(),
                    as_of: parse_as_of(parsed.as_of.as_deref()),
                    checked_at: current_timestamp(),
                })
            }
            Route::Search { url } => {
                let request = self
                    .client
                    .get(&url)
                    .query(&[("q", reference.as_str()), ("fields", "reference,status")]);
                let body = self.fetch(reference, request).await?;
                let parsed: SearchResponse = serde_json::from_value(body)
                    .map_err(|e| VerifyError::Transient(format!("Invalid response: {}", e)))?;

                let hit = parsed
                    .results
                    .into_iter()
                    .next()
                    .ok_or_else(|| VerifyError::NotFound(reference.to_string()))?;

                Ok(VerificationResult {
                    is_current: hit.status.eq_ignore_ascii_case("current"),
                    source_database: SEARCH_SOURCE.to_string(),
                    as_of: parse_as_of(hit.as_of.as_deref()),
                    checked_at: current_timestamp(),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "legal database"
    }
}

/// Map a non-success HTTP status to a classified error
pub fn classify_status(
    status: StatusCode,
    retry_after: Option<Duration>,
    reference: &str,
) -> VerifyError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            VerifyError::NotFound(reference.to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => VerifyError::RateLimited { retry_after },
        _ => VerifyError::Transient(format!("HTTP {}", status)),
    }
}

/// RFC 3339 answer date, or now when absent or unreadable
fn parse_as_of(raw: Option<&str>) -> u64 {
    raw.and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp().max(0) as u64)
        .unwrap_or_else(current_timestamp)
}

/// `Retry-After` as delay-seconds or an HTTP date relative to `now`
///
/// A date already in the past means retry immediately.
fn parse_retry_after(raw: &str, now: u64) -> Option<Duration> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = chrono::DateTime::parse_from_rfc2822(raw).ok()?;
    let at = at.timestamp().max(0) as u64;
    Some(Duration::from_secs(at.saturating_sub(now)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        let r = "42 U.S.C. § 1983";
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, None, r),
            VerifyError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, None, r),
            VerifyError::NotFound(_)
        ));
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(3)), r),
            VerifyError::RateLimited {
                retry_after: Some(Duration::from_secs(3))
            }
        );
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, None, r),
            VerifyError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::REQUEST_TIMEOUT, None, r),
            VerifyError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, None, r),
            VerifyError::Transient(_)
        ));
    }

    #[test]
    fn test_parse_retry_after() {
        // Tue, 02 Jan 2024 03:04:05 GMT
        let now = 1_704_164_645;
        assert_eq!(parse_retry_after("7", now), Some(Duration::from_secs(7)));
        assert_eq!(
            parse_retry_after("Tue, 02 Jan 2024 03:04:35 GMT", now),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            parse_retry_after("Tue, 02 Jan 2024 03:00:00 GMT", now),
            Some(Duration::ZERO)
        );
        assert_eq!(parse_retry_after("soon", now), None);
    }

    #[test]
    fn test_parse_as_of() {
        assert_eq!(parse_as_of(Some("2024-01-02T03:04:05Z")), 1_704_164_645);
        let before = current_timestamp();
        assert!(parse_as_of(Some("yesterday")) >= before);
        assert!(parse_as_of(None) >= before);
    }

    #[test]
    fn test_routes() {
        let source = HttpStatuteSource::new(SourceConfig::new("http://db.test/")).unwrap();

        let usc = CanonicalReference::from_canonical("42 U.S.C. § 2000e-2(a)", Jurisdiction::UsCode);
        match source.route(&usc).unwrap() {
            Route::Section { url, source } => {
                assert_eq!(url, "http://db.test/uscode/v1/titles/42/sections/2000e-2");
                assert_eq!(source, US_CODE_SOURCE);
            }
            Route::Search { .. } => panic!("expected section route"),
        }

        let cfr = CanonicalReference::from_canonical("29 C.F.R. § 1604.11", Jurisdiction::Cfr);
        match source.route(&cfr).unwrap() {
            Route::Section { url, source } => {
                assert_eq!(url, "http://db.test/cfr/v1/titles/29/sections/1604.11");
                assert_eq!(source, CFR_SOURCE);
            }
            Route::Search { .. } => panic!("expected section route"),
        }

        let law = CanonicalReference::from_canonical("Pub. L. No. 88-352", Jurisdiction::PublicLaw);
        assert!(matches!(source.route(&law).unwrap(), Route::Search { .. }));
    }
}
