//! Lexcheck Extractor
//!
//! Finds statute references in document text, normalizes them, and keeps
//! their verification state current.
//!
//! # Overview
//!
//! One extraction pass turns a document's plain text into one statute
//! record per unique canonical reference. Records that lack a fresh
//! verification are checked against the legal database with bounded
//! concurrency; each answer is written to its record as soon as it arrives.
//!
//! # Architecture
//!
//! ```text
//! Text → CitationMatcher → normalize → dedup → StatuteStore::upsert
//!                                                    ↓
//!                      StatuteStore ← apply ← VerificationClient
//! ```
//!
//! # Key Features
//!
//! - **Pattern Table**: federal codes, session laws, the Federal Register, and
//!   state code designators; overlapping matches resolve to the longest
//! - **Canonical Keys**: formatting variants of a citation collapse to one
//!   record per document
//! - **Idempotent Passes**: re-running on unchanged text creates nothing and
//!   leaves fresh verifications alone
//! - **Deletion Safety**: results for a document deleted mid-pass are
//!   discarded
//!
//! # Example Usage
//!
//! ```no_run
//! use lexcheck_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use lexcheck_domain::DocumentId;
//! use lexcheck_domain::traits::StatuteStore;
//! use lexcheck_store::SqliteStore;
//! use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new(":memory:")?;
//! store.ensure_document(DocumentId::new(1), "complaint.pdf")?;
//!
//! let client = VerificationClient::new(MockSource::new(), ClientConfig::default())?;
//! let extractor = Extractor::new(client, store, ExtractorConfig::default())?;
//!
//! let request = ExtractionRequest {
//!     document_id: DocumentId::new(1),
//!     text: "The policy violates 42 U.S.C. § 2000e-2 and 29 C.F.R. § 1604.11.".to_string(),
//! };
//!
//! let result = extractor.extract(request).await?;
//! println!("{}", result.summary.describe());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod matcher;
mod normalizer;
mod patterns;
mod types;


pub use config::ExtractorConfig;
pub use error::{ExtractorError, NormalizationError};
pub use extractor::Extractor;
pub use matcher::{decode_text, excerpt, CitationMatcher, CitationMatches, MIN_CITATION_LEN};
pub use normalizer::normalize;
pub use patterns::{default_patterns, CitationPattern};
pub use types::{
    ExtractionFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult, ReverifyOutcome,
    VerificationOutcome,
};
