//! Lexcheck API
//!
//! HTTP service exposing statute extraction, listing, and re-verification.
//!
//! # Routes
//!
//! - `GET /health` - liveness and record count
//! - `GET /api/statutes` - paginated list, filterable by document, currency, and status
//! - `GET /api/statutes/outdated` - records verified as no longer in force
//! - `GET /api/statutes/:id` - one record
//! - `PUT /api/statutes/:id` - verify one record again, bypassing the cache
//! - `POST /api/documents/:id/extract` - register a document and run an extraction pass
//! - `DELETE /api/documents/:id` - delete a document and its records
//!
//! Errors are returned as `{"error": "..."}` with status 400, 404, or 500.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod views;

use config::ApiConfig;
use handlers::{create_router, AppState};
use lexcheck_extractor::{Extractor, ExtractorError};
use lexcheck_janitor::{Sweeper, SweepWorker};
use lexcheck_store::{SqliteStore, StoreError};
use lexcheck_verify::{HttpStatuteSource, VerificationClient, VerifyError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Verification client could not be built
    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    /// Extractor could not be built
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the API HTTP server
///
/// Opens the database, builds the verification client and extractor,
/// starts the background sweep when configured, and serves until the
/// process is stopped.
pub async fn start_server(config: ApiConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting Lexcheck API");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Legal database: {}", config.source.base_url);

    let store = SqliteStore::new(&config.database_path)?;
    let source = HttpStatuteSource::new(config.source.clone())?;
    let client = VerificationClient::new(source, config.client.clone())?;
    let extractor = Arc::new(Extractor::new(client, store, config.extractor.clone())?);

    if let Some(sweep) = config.sweep.clone() {
        let sweeper = Sweeper::new(Arc::clone(&extractor), sweep)
            .map_err(|e| ServerError::Server(e.to_string()))?;
        let mut worker = SweepWorker::new(sweeper);
        tokio::spawn(async move {
            if let Err(e) = worker.run().await {
                error!("Sweep worker stopped: {}", e);
            }
        });
        info!("Background sweep enabled");
    }

    let app = create_router(AppState::new(extractor));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = ApiConfig::default();
        config.extractor.max_concurrency = 0;

        let result = start_server(config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
