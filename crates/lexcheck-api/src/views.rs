//! JSON representations served by the API
//!
//! Domain timestamps are unix seconds; the API renders them as RFC 3339.

use chrono::{DateTime, SecondsFormat};
use lexcheck_domain::{ExtractionSummary, StatuteRecord};
use lexcheck_extractor::{ExtractionResult, ReverifyOutcome, VerificationOutcome};
use serde::{Deserialize, Serialize};

/// Render unix seconds as an RFC 3339 UTC timestamp
pub fn rfc3339(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One statute record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatuteView {
    /// Record identifier
    pub id: i64,
    /// Owning document
    pub document_id: i64,
    /// Canonical reference
    pub reference: String,
    /// Jurisdiction label
    pub jurisdiction: String,
    /// Longest display form found in the document
    pub display_text: String,
    /// Surrounding text with the citation emphasised
    pub excerpt: String,
    /// Verification status
    pub status: String,
    /// Currency flag; absent until verified and while unresolved
    pub is_current: Option<bool>,
    /// When the applied verification was obtained
    pub verified_at: Option<String>,
    /// Source of the applied verification
    pub source_database: Option<String>,
    /// When the last failed attempt happened
    pub last_checked_at: Option<String>,
    /// Reason of the last failed attempt
    pub last_error: Option<String>,
    /// When the record was created
    pub created_at: String,
}

impl From<StatuteRecord> for StatuteView {
    fn from(record: StatuteRecord) -> Self {
        Self {
            id: record.id.value(),
            document_id: record.document_id.value(),
            reference: record.reference,
            jurisdiction: record.jurisdiction.as_str().to_string(),
            display_text: record.display_text,
            excerpt: record.excerpt,
            status: record.status.as_str().to_string(),
            is_current: record.is_current,
            verified_at: record.verified_at.map(rfc3339),
            source_database: record.source_database,
            last_checked_at: record.last_checked_at.map(rfc3339),
            last_error: record.last_error,
            created_at: rfc3339(record.created_at),
        }
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// Matching records across all pages
    pub total: usize,
    /// Number of pages
    pub pages: usize,
}

impl Pagination {
    /// Build the pagination block for a page of `total` items
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        Self {
            page,
            per_page,
            total,
            pages: total.div_ceil(per_page.max(1)),
        }
    }
}

/// A page of statute records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutePage {
    /// Records on this page
    pub items: Vec<StatuteView>,
    /// Page position
    pub pagination: Pagination,
}

/// Aggregate counts of a pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryView {
    /// Unique references
    pub total: usize,
    /// Current records
    pub current: usize,
    /// Outdated records
    pub outdated: usize,
    /// Unresolved records
    pub unresolved: usize,
    /// Records never verified
    pub unverified: usize,
    /// Records created by the pass
    pub created: usize,
    /// Verification results applied
    pub verified: usize,
    /// Records skipped because their verification was fresh
    pub skipped_fresh: usize,
    /// Results dropped because the document disappeared
    pub discarded: usize,
}

impl From<ExtractionSummary> for SummaryView {
    fn from(s: ExtractionSummary) -> Self {
        Self {
            total: s.total,
            current: s.current,
            outdated: s.outdated,
            unresolved: s.unresolved,
            unverified: s.unverified,
            created: s.created,
            verified: s.verified,
            skipped_fresh: s.skipped_fresh,
            discarded: s.discarded,
        }
    }
}

/// Request body of `POST /api/documents/:id/extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractBody {
    /// Plain text of the document
    pub text: String,
    /// Display label used when the document is registered
    #[serde(default)]
    pub label: Option<String>,
}

/// Response of an extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Pass identifier
    pub pass_id: String,
    /// Owning document
    pub document_id: i64,
    /// Aggregate counts
    pub summary: SummaryView,
    /// Records touched by the pass
    pub statutes: Vec<StatuteView>,
    /// Matches dropped because they could not be normalized
    pub failures: Vec<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl From<ExtractionResult> for ExtractResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            pass_id: result.metadata.pass_id.to_string(),
            document_id: result.metadata.document_id.value(),
            summary: result.summary.into(),
            statutes: result.records.into_iter().map(StatuteView::from).collect(),
            failures: result.failures.into_iter().map(|f| f.reason).collect(),
            processing_time_ms: result.metadata.processing_time_ms,
        }
    }
}

/// Response of `PUT /api/statutes/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverifyResponse {
    /// `verified`, `failed`, or `discarded`
    pub outcome: String,
    /// Human readable message
    pub message: String,
    /// Updated record, absent when discarded
    pub statute: Option<StatuteView>,
}

impl From<ReverifyOutcome> for ReverifyResponse {
    fn from(outcome: ReverifyOutcome) -> Self {
        let label = match outcome.outcome {
            VerificationOutcome::Verified => "verified",
            VerificationOutcome::Failed(_) => "failed",
            VerificationOutcome::Discarded => "discarded",
        };
        Self {
            outcome: label.to_string(),
            message: outcome.message(),
            statute: outcome.record.map(StatuteView::from),
        }
    }
}

/// Response of `DELETE /api/documents/:id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    /// Deleted document
    pub document_id: i64,
    /// Statute records removed with it
    pub removed: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
    /// Stored statute records
    pub statutes: usize,
}
