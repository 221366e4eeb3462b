//! Configuration file parsing for the API server.
//!
//! Loads the bind address, database location, and the verification,
//! extraction, and sweep settings from a TOML file.

use lexcheck_extractor::ExtractorConfig;
use lexcheck_janitor::SweepConfig;
use lexcheck_verify::{ClientConfig, SourceConfig};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// API configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A section failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// API server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Legal database connection
    #[serde(default)]
    pub source: SourceConfig,

    /// Call policy of the verification client
    #[serde(default)]
    pub client: ClientConfig,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Background re-verification; disabled when absent
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "lexcheck.db".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            source: SourceConfig::default(),
            client: ClientConfig::default(),
            extractor: ExtractorConfig::default(),
            sweep: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.client
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.extractor.validate().map_err(ConfigError::Invalid)?;
        if let Some(sweep) = &self.sweep {
            sweep.validate().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database_path, "lexcheck.db");
        assert!(config.sweep.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "/var/lib/lexcheck/statutes.db"

            [source]
            base_url = "https://legal.example.com"
            timeout_secs = 10

            [extractor]
            max_text_length = 1000000
            max_concurrency = 2
            stale_after_secs = 86400
            excerpt_context_chars = 80

            [sweep]
            stale_after_hours = 24
            sweep_interval_minutes = 30
            batch_limit = 100
        "#;

        let config = ApiConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.source.base_url, "https://legal.example.com");
        assert_eq!(config.source.api_key, None);
        assert_eq!(config.extractor.max_concurrency, 2);
        assert_eq!(config.client, ClientConfig::default());
        assert_eq!(config.sweep.as_ref().map(|s| s.batch_limit), Some(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_section() {
        let toml = r#"
            [extractor]
            max_text_length = 1000
            max_concurrency = 0
            stale_after_secs = 60
            excerpt_context_chars = 10
        "#;

        let config = ApiConfig::from_toml(toml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
