//! Lexcheck Janitor
//!
//! Background re-verification service that keeps statute records from going
//! stale.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Stale record detection**: finding verifications older than the
//!   configured age, plus records never verified or left unresolved
//! - **Re-verification**: checking them again against the legal database,
//!   bypassing cached answers
//! - **Metrics collection**: tracking sweep outcomes for monitoring
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use lexcheck_janitor::{SweepConfig, Sweeper};
//! use lexcheck_extractor::{Extractor, ExtractorConfig};
//! use lexcheck_store::SqliteStore;
//! use lexcheck_verify::{ClientConfig, HttpStatuteSource, SourceConfig, VerificationClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("lexcheck.db")?;
//! let source = HttpStatuteSource::new(SourceConfig::default())?;
//! let client = VerificationClient::new(source, ClientConfig::default())?;
//! let extractor = Arc::new(Extractor::new(client, store, ExtractorConfig::default())?);
//!
//! let mut sweeper = Sweeper::new(extractor, SweepConfig::default())?;
//! let metrics = sweeper.sweep().await?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use lexcheck_janitor::SweepConfig;
//!
//! // Default: monthly re-verification, hourly sweeps
//! let config = SweepConfig::default();
//!
//! // Aggressive: weekly re-verification, sweeps every 15 minutes
//! let config = SweepConfig::aggressive();
//!
//! // Lenient: quarterly re-verification, sweeps every 4 hours
//! let config = SweepConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! The sweep can be configured via TOML:
//!
//! ```toml
//! stale_after_hours = 720
//! sweep_interval_minutes = 60
//! batch_limit = 200
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod sweeper;
mod worker;

pub use config::SweepConfig;
pub use error::JanitorError;
pub use metrics::SweepMetrics;
pub use sweeper::Sweeper;
pub use worker::SweepWorker;
