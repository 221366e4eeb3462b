//! Statute record module - the persisted unit of verification state

use crate::citation::{CanonicalReference, Jurisdiction};
use std::fmt;

/// Identifier of a document owned by the upload layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Create a DocumentId from its raw value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a persisted statute record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatuteId(i64);

impl StatuteId {
    /// Create a StatuteId from its raw value (storage layer use)
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for StatuteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verification state of a statute record
///
/// ```text
/// Unverified ──► Current | Outdated | Unresolved
/// Current/Outdated ──► Current | Outdated        (re-verification)
/// Unresolved ──► Current | Outdated | Unresolved
/// ```
///
/// There is no terminal state. `Unresolved` never implies either boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    /// Created, not yet checked
    Unverified,

    /// Source reports the statute is in force
    Current,

    /// Source reports the statute is repealed, superseded, or amended away
    Outdated,

    /// Source could not determine currency
    Unresolved,
}

impl VerificationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Current => "current",
            VerificationStatus::Outdated => "outdated",
            VerificationStatus::Unresolved => "unresolved",
        }
    }

    /// Parse a status from a string (storage layer use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unverified" => Some(VerificationStatus::Unverified),
            "current" => Some(VerificationStatus::Current),
            "outdated" => Some(VerificationStatus::Outdated),
            "unresolved" => Some(VerificationStatus::Unresolved),
            _ => None,
        }
    }

    /// Status implied by a successful verification
    pub fn from_is_current(is_current: bool) -> Self {
        if is_current {
            VerificationStatus::Current
        } else {
            VerificationStatus::Outdated
        }
    }

    /// Whether a successful verification has been applied
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Current | VerificationStatus::Outdated)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verification answer for one canonical reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the statute is in force
    pub is_current: bool,

    /// Which external source answered
    pub source_database: String,

    /// Currency date the source reported for its answer (seconds since epoch)
    pub as_of: u64,

    /// When the lookup ran (seconds since epoch); stored as `verified_at`
    pub checked_at: u64,
}

/// Per-document verification state for one canonical reference
///
/// Identity is the `(document_id, reference)` pair; `id` is the storage
/// row identifier used by the JSON API.
#[derive(Debug, Clone, PartialEq)]
pub struct StatuteRecord {
    /// Storage identifier
    pub id: StatuteId,

    /// Owning document
    pub document_id: DocumentId,

    /// Canonical key (unique per document)
    pub reference: String,

    /// Jurisdiction of the citation
    pub jurisdiction: Jurisdiction,

    /// Longest display form seen in the document
    pub display_text: String,

    /// Surrounding text of the display form
    pub excerpt: String,

    /// Verification state
    pub status: VerificationStatus,

    /// Currency flag; `None` until verified and while unresolved
    pub is_current: Option<bool>,

    /// When the applied verification was obtained
    pub verified_at: Option<u64>,

    /// Source that answered the applied verification
    pub source_database: Option<String>,

    /// When the last failed attempt happened
    pub last_checked_at: Option<u64>,

    /// Reason of the last failed attempt
    pub last_error: Option<String>,

    /// When the record was created
    pub created_at: u64,
}

impl StatuteRecord {
    /// The record's key as a typed canonical reference
    pub fn canonical_reference(&self) -> CanonicalReference {
        CanonicalReference::from_canonical(self.reference.clone(), self.jurisdiction)
    }

    /// Whether the record needs a (re-)verification at time `now`
    ///
    /// Unverified and unresolved records always do; verified ones once their
    /// verification is older than `stale_after_secs`.
    pub fn needs_verification(&self, now: u64, stale_after_secs: u64) -> bool {
        match (self.status.is_verified(), self.verified_at) {
            (true, Some(verified_at)) => verified_at < now.saturating_sub(stale_after_secs),
            _ => true,
        }
    }
}
