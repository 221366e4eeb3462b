//! Error types for the Extractor

use lexcheck_domain::DocumentId;
use thiserror::Error;

/// Errors that abort an extraction or re-verification pass
///
/// Per-reference failures (normalization, verification) never surface
/// here; they are folded into the pass result.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input bytes are not valid text
    #[error("Input decoding error: {0}")]
    InputDecoding(String),

    /// The document is not registered
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Re-verification target does not exist
    #[error("Statute record not found: {0}")]
    UnknownStatute(String),

    /// Text exceeds maximum length
    #[error("Text too long: {0} bytes (max: {1})")]
    TextTooLong(usize, usize),

    /// Statute store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A citation substring that does not fit its jurisdiction's grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot normalize '{raw}' as {jurisdiction}: {reason}")]
pub struct NormalizationError {
    /// The offending substring
    pub raw: String,

    /// Jurisdiction whose grammar was applied
    pub jurisdiction: String,

    /// What did not fit
    pub reason: String,
}
