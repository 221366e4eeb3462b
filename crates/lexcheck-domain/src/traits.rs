//! Trait definitions for persistence
//!
//! These traits define the boundary between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    CanonicalReference, DocumentId, StatuteId, StatuteRecord, VerificationResult,
    VerificationStatus,
};

/// Result of an idempotent upsert
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    /// The single record for the `(document, reference)` pair
    pub record: StatuteRecord,

    /// Whether this call created the record
    pub created: bool,
}

/// Result of writing a verification outcome to a record
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The record was updated
    Applied(StatuteRecord),

    /// The owning document no longer exists; nothing was written
    DocumentGone,
}

/// Trait for storing and retrieving statute records
///
/// Implemented by the infrastructure layer (lexcheck-store).
///
/// Calling `apply_verification` or `record_failure` for a pair that was
/// never upserted is a programming error and must fail rather than create a
/// record.
pub trait StatuteStore {
    /// Error type for store operations
    type Error;

    /// Register a document if it is not known yet
    fn ensure_document(&mut self, id: DocumentId, label: &str) -> Result<(), Self::Error>;

    /// Whether a document is registered
    fn document_exists(&self, id: DocumentId) -> Result<bool, Self::Error>;

    /// Delete a document and all of its statute records
    ///
    /// Returns the number of statute records removed.
    fn delete_document(&mut self, id: DocumentId) -> Result<usize, Self::Error>;

    /// Create the record for a pair, or return the existing one
    ///
    /// Never touches verification state. Replaces display text and excerpt
    /// only when `display_text` is strictly longer than the stored one.
    fn upsert(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        display_text: &str,
        excerpt: &str,
    ) -> Result<UpsertOutcome, Self::Error>;

    /// Write a successful verification to the record for a pair
    fn apply_verification(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        result: &VerificationResult,
    ) -> Result<ApplyOutcome, Self::Error>;

    /// Record a failed verification attempt for a pair
    ///
    /// Unverified and unresolved records become unresolved; verified
    /// records keep their last verification.
    fn record_failure(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        reason: &str,
        checked_at: u64,
    ) -> Result<ApplyOutcome, Self::Error>;

    /// Get a record by ID
    fn get(&self, id: StatuteId) -> Result<Option<StatuteRecord>, Self::Error>;

    /// Get the record for a `(document, reference)` pair
    fn find(
        &self,
        document_id: DocumentId,
        reference: &CanonicalReference,
    ) -> Result<Option<StatuteRecord>, Self::Error>;

    /// All records of a document in insertion order
    fn list_by_document(&self, document_id: DocumentId) -> Result<Vec<StatuteRecord>, Self::Error>;

    /// Records never verified or verified before `older_than`, oldest first
    fn list_stale(
        &self,
        older_than: u64,
        limit: Option<usize>,
    ) -> Result<Vec<StatuteRecord>, Self::Error>;

    /// Query records matching criteria, ordered by reference
    fn query(&self, query: &StatuteQuery) -> Result<Vec<StatuteRecord>, Self::Error>;

    /// Count records matching criteria (pagination is ignored)
    fn count(&self, query: &StatuteQuery) -> Result<usize, Self::Error>;
}

/// Query criteria for retrieving statute records
#[derive(Debug, Clone, Default)]
pub struct StatuteQuery {
    /// Filter by owning document
    pub document_id: Option<DocumentId>,

    /// Filter by currency flag (unresolved and unverified records match neither)
    pub is_current: Option<bool>,

    /// Filter by status
    pub status: Option<VerificationStatus>,

    /// 1-based page number
    pub page: Option<usize>,

    /// Page size, capped at [`StatuteQuery::MAX_PER_PAGE`]
    pub per_page: Option<usize>,
}

impl StatuteQuery {
    /// Largest page size served
    pub const MAX_PER_PAGE: usize = 100;

    /// Default page size
    pub const DEFAULT_PER_PAGE: usize = 20;

    /// Effective page number (at least 1)
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to `1..=MAX_PER_PAGE`
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    /// Row offset of the effective page
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Whether pagination was requested
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }
}
