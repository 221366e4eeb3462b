//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Statute store error
    #[error("Store error: {0}")]
    Store(#[from] lexcheck_store::StoreError),

    /// Verification client error
    #[error("Verification error: {0}")]
    Verify(#[from] lexcheck_verify::VerifyError),

    /// Extraction error
    #[error(transparent)]
    Extractor(#[from] lexcheck_extractor::ExtractorError),

    /// Sweep error
    #[error("Sweep error: {0}")]
    Janitor(#[from] lexcheck_janitor::JanitorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown document or record
    #[error("Not found: {0}")]
    NotFound(String),
}
