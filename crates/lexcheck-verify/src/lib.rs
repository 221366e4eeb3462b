//! Lexcheck Verification Layer
//!
//! Answers "is this statute still in force?" for one canonical reference.
//!
//! # Architecture
//!
//! - [`StatuteSource`]: one raw lookup against an external legal database
//!   - [`HttpStatuteSource`]: the HTTP legal database API
//!   - [`MockSource`]: scripted answers for testing
//! - [`VerificationClient`]: timeout, retry with exponential backoff, shared
//!   rate-limit cooldown, and a TTL cache around any source
//!
//! Failures are classified by [`VerifyError`]: `NotFound` means the source
//! cannot say (never "outdated"), `Transient` is retried, `RateLimited`
//! pauses every call on the client.
//!
//! # Examples
//!
//! ```
//! use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};
//! use lexcheck_domain::{CanonicalReference, Jurisdiction};
//!
//! let source = MockSource::new();
//! source.respond("29 C.F.R. § 1604.11", false);
//!
//! let client = VerificationClient::new(source, ClientConfig::default()).unwrap();
//! let reference = CanonicalReference::from_canonical("29 C.F.R. § 1604.11", Jurisdiction::Cfr);
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let result = runtime.block_on(client.verify(&reference)).unwrap();
//! assert!(!result.is_current);
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod mock;
pub mod source;

pub use cache::VerificationCache;
pub use client::VerificationClient;
pub use config::{ClientConfig, SourceConfig};
pub use error::VerifyError;
pub use gate::CooldownGate;
pub use http::HttpStatuteSource;
pub use mock::MockSource;
pub use source::StatuteSource;
