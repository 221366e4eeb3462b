//! Extraction summary - aggregate counts of one pass

use crate::record::{StatuteRecord, VerificationStatus};

/// Aggregate counts returned after an extraction or re-verification pass
///
/// Derived from the records touched by the pass; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Unique canonical references in the pass
    pub total: usize,

    /// Records verified as current
    pub current: usize,

    /// Records verified as outdated
    pub outdated: usize,

    /// Records whose currency could not be determined
    pub unresolved: usize,

    /// Records still unverified at the end of the pass
    pub unverified: usize,

    /// Records created by this pass
    pub created: usize,

    /// Verification results applied by this pass
    pub verified: usize,

    /// Records left untouched because their verification was fresh
    pub skipped_fresh: usize,

    /// Results dropped because the owning document disappeared
    pub discarded: usize,
}

impl ExtractionSummary {
    /// Tally the status counters from a set of final records
    ///
    /// Pass-level counters (`created`, `verified`, `skipped_fresh`,
    /// `discarded`) are left at zero for the caller to fill in.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a StatuteRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            match record.status {
                VerificationStatus::Current => summary.current += 1,
                VerificationStatus::Outdated => summary.outdated += 1,
                VerificationStatus::Unresolved => summary.unresolved += 1,
                VerificationStatus::Unverified => summary.unverified += 1,
            }
        }
        summary
    }

    /// One-line human readable description
    pub fn describe(&self) -> String {
        format!(
            "{} references: {} current, {} outdated, {} unresolved, {} unverified",
            self.total, self.current, self.outdated, self.unresolved, self.unverified
        )
    }
}
