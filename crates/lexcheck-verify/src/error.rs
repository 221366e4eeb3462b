//! Error types for verification sources

use std::time::Duration;
use thiserror::Error;

/// Classified failure of a verification lookup
///
/// The classification decides what the caller does next: `Transient` is
/// retried, `RateLimited` pauses the client, `NotFound` is final for the
/// pass and leaves the record unresolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The source does not know the reference
    #[error("Reference not found: {0}")]
    NotFound(String),

    /// Network failure, timeout, 5xx, or malformed response
    #[error("Transient failure: {0}")]
    Transient(String),

    /// The source asked us to back off
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Pause requested by the source, if it sent one
        retry_after: Option<Duration>,
    },

    /// Invalid source or client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VerifyError {
    /// Whether the failure may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerifyError::Transient(_) | VerifyError::RateLimited { .. })
    }
}
