//! Configuration for sweep operations
//!
//! Defines how old a verification may get and how often the sweep runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the re-verification sweep
///
/// # Examples
///
/// ```
/// use lexcheck_janitor::SweepConfig;
///
/// // Default configuration (monthly re-verification, hourly sweeps)
/// let config = SweepConfig::default();
/// assert_eq!(config.stale_after_hours, 720);
///
/// // Aggressive re-verification
/// let config = SweepConfig::aggressive();
/// assert_eq!(config.stale_after_hours, 168);
///
/// // Lenient re-verification
/// let config = SweepConfig::lenient();
/// assert_eq!(config.stale_after_hours, 2160);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Age after which a verification is checked again (in hours)
    /// Default: 720 hours (30 days)
    pub stale_after_hours: u64,

    /// How often to run the sweep cycle (in minutes)
    /// Default: Every 60 minutes (hourly)
    pub sweep_interval_minutes: u64,

    /// Maximum records re-verified per sweep, oldest first
    /// Default: 200
    pub batch_limit: usize,

    /// Dry-run mode: log what would be re-verified without calling the source
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for SweepConfig {
    /// Create default configuration
    ///
    /// - Stale after: 30 days
    /// - Sweep interval: 60 minutes (hourly)
    /// - Batch limit: 200 records
    fn default() -> Self {
        Self {
            stale_after_hours: 720,
            sweep_interval_minutes: 60,
            batch_limit: 200,
            dry_run: false,
        }
    }
}

impl SweepConfig {
    /// Aggressive configuration (weekly re-verification, frequent sweeps)
    ///
    /// Suitable when outdated references must surface quickly.
    ///
    /// - Stale after: 7 days
    /// - Sweep interval: 15 minutes
    /// - Batch limit: 500 records
    pub fn aggressive() -> Self {
        Self {
            stale_after_hours: 168,
            sweep_interval_minutes: 15,
            batch_limit: 500,
            dry_run: false,
        }
    }

    /// Lenient configuration (quarterly re-verification, infrequent sweeps)
    ///
    /// Suitable for metered legal database plans.
    ///
    /// - Stale after: 90 days
    /// - Sweep interval: 240 minutes (4 hours)
    /// - Batch limit: 50 records
    pub fn lenient() -> Self {
        Self {
            stale_after_hours: 2160,
            sweep_interval_minutes: 240,
            batch_limit: 50,
            dry_run: false,
        }
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes * 60)
    }

    /// Get the staleness threshold as Duration
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_hours * 3600)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.stale_after_hours == 0 {
            return Err("stale_after_hours must be greater than 0".to_string());
        }
        if self.sweep_interval_minutes == 0 {
            return Err("sweep_interval_minutes must be greater than 0".to_string());
        }
        if self.batch_limit == 0 {
            return Err("batch_limit must be greater than 0".to_string());
        }
        Ok(())
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
