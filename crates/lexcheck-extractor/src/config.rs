//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum input text length (bytes)
    pub max_text_length: usize,

    /// Maximum verification calls in flight per pass
    pub max_concurrency: usize,

    /// Age after which a verification is re-checked (seconds)
    pub stale_after_secs: u64,

    /// Characters of surrounding text kept on each side of a citation
    pub excerpt_context_chars: usize,
}

impl ExtractorConfig {
    /// Get the staleness threshold as a Duration
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.stale_after_secs == 0 {
            return Err("stale_after_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration: 4 calls in flight, verifications kept 30 days
    fn default() -> Self {
        Self {
            max_text_length: 2_000_000,
            max_concurrency: 4,
            stale_after_secs: 30 * 86_400,
            excerpt_context_chars: 100,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: more parallel calls, weekly re-verification
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 2_000_000,
            max_concurrency: 8,
            stale_after_secs: 7 * 86_400,
            excerpt_context_chars: 100,
        }
    }

    /// Lenient preset: gentle on the source, quarterly re-verification
    pub fn lenient() -> Self {
        Self {
            max_text_length: 5_000_000,
            max_concurrency: 2,
            stale_after_secs: 90 * 86_400,
            excerpt_context_chars: 150,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = ExtractorConfig::default();
        config.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_stale_after() {
        let mut config = ExtractorConfig::default();
        config.stale_after_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::aggressive();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
        assert_eq!(parsed.stale_after(), Duration::from_secs(7 * 86_400));
    }
}
