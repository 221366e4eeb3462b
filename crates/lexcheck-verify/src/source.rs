//! The verification source boundary

use crate::VerifyError;
use async_trait::async_trait;
use lexcheck_domain::{CanonicalReference, VerificationResult};

/// One external legal database lookup
///
/// Implementations perform a single attempt and classify its failure;
/// retries, timeouts, rate-limit pauses, and caching are layered on top by
/// [`VerificationClient`](crate::VerificationClient).
#[async_trait]
pub trait StatuteSource: Send + Sync {
    /// Look up the currency of one canonical reference
    async fn lookup(&self, reference: &CanonicalReference)
        -> Result<VerificationResult, VerifyError>;

    /// Human readable name used in logs
    fn name(&self) -> &str;
}
