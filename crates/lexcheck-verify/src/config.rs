//! Configuration for verification sources and the client

use crate::VerifyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default legal database endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.law.gov";

/// Connection settings for the HTTP legal database
///
/// The API key is part of the configuration object; the source never reads
/// the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the legal database API (no trailing slash)
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Transport-level request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    /// Create a configuration for the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the bearer token
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Base URL without trailing slashes
    pub fn endpoint(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), VerifyError> {
        let url = self.endpoint();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(VerifyError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(VerifyError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Retry, rate-limit, and caching policy of a [`VerificationClient`]
///
/// [`VerificationClient`]: crate::VerificationClient
///
/// # Examples
///
/// ```
/// use lexcheck_verify::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.max_attempts, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Total attempts for a transient failure, first call included
    pub max_attempts: u32,

    /// Delay before the second attempt (milliseconds); doubles per attempt
    pub base_backoff_ms: u64,

    /// Upper bound of a single backoff delay (milliseconds)
    pub max_backoff_ms: u64,

    /// Pause applied when the source rate-limits without `Retry-After`
    pub rate_limit_cooldown_secs: u64,

    /// How many rate-limit pauses one reference may trigger before failing
    pub max_rate_limit_pauses: u32,

    /// Upper bound of a single source call (seconds)
    pub call_timeout_secs: u64,

    /// How long successful results are served from cache (0 disables)
    pub cache_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 1_000,
            max_backoff_ms: 8_000,
            rate_limit_cooldown_secs: 30,
            max_rate_limit_pauses: 3,
            call_timeout_secs: 15,
            cache_ttl_secs: 3_600,
        }
    }
}

impl ClientConfig {
    /// Aggressive preset: fail fast, short cache
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 2,
            base_backoff_ms: 250,
            max_backoff_ms: 2_000,
            rate_limit_cooldown_secs: 10,
            max_rate_limit_pauses: 1,
            call_timeout_secs: 5,
            cache_ttl_secs: 600,
        }
    }

    /// Lenient preset: patient retries, long cache
    pub fn lenient() -> Self {
        Self {
            max_attempts: 5,
            base_backoff_ms: 2_000,
            max_backoff_ms: 30_000,
            rate_limit_cooldown_secs: 60,
            max_rate_limit_pauses: 5,
            call_timeout_secs: 30,
            cache_ttl_secs: 86_400,
        }
    }

    /// Delay before attempt `failed_attempts + 1`
    ///
    /// `base_backoff_ms * 2^(failed_attempts - 1)`, capped at `max_backoff_ms`.
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        let factor = 2u64.saturating_pow(failed_attempts.saturating_sub(1));
        let millis = self
            .base_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }

    /// Single call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Default rate-limit pause as a Duration
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }

    /// Cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.max_attempts == 0 {
            return Err(VerifyError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(VerifyError::Config(
                "call_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.base_backoff_ms > self.max_backoff_ms {
            return Err(VerifyError::Config(
                "base_backoff_ms cannot exceed max_backoff_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, VerifyError> {
        toml::from_str(toml_str)
            .map_err(|e| VerifyError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, VerifyError> {
        toml::to_string_pretty(self)
            .map_err(|e| VerifyError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
