//! Error types for sweep operations

use lexcheck_extractor::ExtractorError;
use thiserror::Error;

/// Errors that can occur during a sweep
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Re-verification pass failed
    #[error("Re-verification error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
