//! Verification client: timeouts, retries, rate limiting, and caching

use crate::cache::VerificationCache;
use crate::config::ClientConfig;
use crate::gate::CooldownGate;
use crate::source::StatuteSource;
use crate::VerifyError;
use lexcheck_domain::{CanonicalReference, VerificationResult};
use tracing::{debug, warn};

/// Wraps a [`StatuteSource`] with the call policy of [`ClientConfig`]
///
/// - every call is bounded by `call_timeout_secs` (elapsed counts as
///   transient)
/// - transient failures are retried up to `max_attempts` total attempts
///   with exponential backoff
/// - a rate-limited answer closes a cooldown gate shared by all calls on
///   this client, then the same reference is re-issued
/// - successful answers are cached for `cache_ttl_secs`
///
/// Share one client between tasks through an `Arc`.
pub struct VerificationClient<S> {
    source: S,
    config: ClientConfig,
    cache: VerificationCache,
    gate: CooldownGate,
}

impl<S: StatuteSource> VerificationClient<S> {
    /// Create a client around a source
    pub fn new(source: S, config: ClientConfig) -> Result<Self, VerifyError> {
        config.validate()?;
        Ok(Self {
            source,
            cache: VerificationCache::new(config.cache_ttl()),
            gate: CooldownGate::new(),
            config,
        })
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The client's call policy
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The result cache
    pub fn cache(&self) -> &VerificationCache {
        &self.cache
    }

    /// Verify a reference, serving a fresh cached answer when available
    pub async fn verify(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        if let Some(hit) = self.cache.get(reference.as_str()) {
            debug!("Cache hit for {}", reference);
            return Ok(hit);
        }
        self.verify_fresh(reference).await
    }

    /// Verify a reference against the source, ignoring cached answers
    ///
    /// A success still refreshes the cache.
    pub async fn verify_fresh(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        let result = self.call_with_policy(reference).await?;
        self.cache.insert(reference.as_str(), result.clone());
        Ok(result)
    }

    async fn call_with_policy(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        let mut attempts = 0u32;
        let mut pauses = 0u32;

        loop {
            self.gate.wait().await;

            match self.call_once(reference).await {
                Ok(result) => return Ok(result),
                Err(VerifyError::Transient(reason)) => {
                    attempts += 1;
                    if attempts >= self.config.max_attempts {
                        warn!(
                            "Giving up on {} after {} attempts: {}",
                            reference, attempts, reason
                        );
                        return Err(VerifyError::Transient(reason));
                    }

                    let delay = self.config.backoff(attempts);
                    debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempts, reference, reason, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(VerifyError::RateLimited { retry_after }) => {
                    pauses += 1;
                    if pauses > self.config.max_rate_limit_pauses {
                        warn!("Rate limit persisted for {}, giving up", reference);
                        return Err(VerifyError::RateLimited { retry_after });
                    }

                    let pause = retry_after.unwrap_or_else(|| self.config.rate_limit_cooldown());
                    warn!(
                        "{} rate limited the client, pausing for {:?}",
                        self.source.name(),
                        pause
                    );
                    self.gate.trip(pause);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_once(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        let timeout = self.config.call_timeout();
        match tokio::time::timeout(timeout, self.source.lookup(reference)).await {
            Ok(result) => result,
            Err(_) => Err(VerifyError::Transient(format!(
                "{} did not answer within {:?}",
                self.source.name(),
                timeout
            ))),
        }
    }
}
