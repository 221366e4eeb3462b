//! Lexcheck Domain Layer
//!
//! This crate contains the core domain model for Lexcheck, the statute
//! citation extraction and verification workflow. It has no external
//! dependencies and defines the value objects and trait interfaces that all
//! other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Canonical reference**: normalized citation string used as the dedup and lookup key
//! - **Statute record**: per-document verification state for one canonical reference
//! - **Verification status**: `Unverified → Current | Outdated | Unresolved`
//! - **Stale**: a verification older than the configured re-check interval
//! - **Unresolved**: a citation whose currency the external source could not determine
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all persistence interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod record;
pub mod summary;
pub mod traits;

// Re-exports for convenience
pub use citation::{CanonicalReference, Jurisdiction, RawCitationMatch};
pub use record::{
    DocumentId, StatuteId, StatuteRecord, VerificationResult, VerificationStatus,
};
pub use summary::ExtractionSummary;

/// Current timestamp in seconds since the Unix epoch
///
/// Returns 0 if the system clock is set before the epoch.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
