//! Request and response types for extraction

use lexcheck_domain::{DocumentId, ExtractionSummary, StatuteRecord};
use lexcheck_verify::VerifyError;
use uuid::Uuid;

/// Request to extract statute references from a document's text
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Owning document (must be registered in the store)
    pub document_id: DocumentId,

    /// Plain text of the document
    pub text: String,
}

/// Result of an extraction pass
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Aggregate counts
    pub summary: ExtractionSummary,

    /// Final state of every record touched, in discovery order
    pub records: Vec<StatuteRecord>,

    /// Matches dropped because they could not be normalized
    pub failures: Vec<ExtractionFailure>,

    /// Metadata about the pass
    pub metadata: ExtractionMetadata,
}

/// A match that was dropped during the pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    /// Reason for failure
    pub reason: String,

    /// Text fragment that failed to normalize
    pub raw_text: String,
}

/// Metadata about an extraction pass
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Unique, time-ordered pass identifier
    pub pass_id: Uuid,

    /// Owning document
    pub document_id: DocumentId,

    /// Timestamp when the pass started
    pub timestamp: u64,

    /// Raw matches emitted by the matcher, duplicates included
    pub matches_found: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// What happened to one verification attempt
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// A result was applied to the record
    Verified,

    /// The source failed; the failure was recorded on the record
    Failed(VerifyError),

    /// The owning document vanished; nothing was written
    Discarded,
}

/// Result of an explicit re-verification of one record
#[derive(Debug, Clone)]
pub struct ReverifyOutcome {
    /// The updated record, absent when the outcome was discarded
    pub record: Option<StatuteRecord>,

    /// What happened
    pub outcome: VerificationOutcome,
}

impl ReverifyOutcome {
    /// Human readable message for API and CLI output
    pub fn message(&self) -> String {
        match (&self.outcome, &self.record) {
            (VerificationOutcome::Verified, Some(record)) => {
                format!("{} is {}", record.reference, record.status)
            }
            (VerificationOutcome::Failed(e), Some(record)) => {
                format!("Could not verify {}: {}", record.reference, e)
            }
            _ => "Document was deleted during verification".to_string(),
        }
    }
}
