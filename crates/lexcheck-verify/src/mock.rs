//! Scripted source for deterministic testing

use crate::source::StatuteSource;
use crate::VerifyError;
use async_trait::async_trait;
use lexcheck_domain::{current_timestamp, CanonicalReference, VerificationResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Source name reported by [`MockSource`]
pub const MOCK_SOURCE: &str = "Mock Source";

type Outcome = Result<VerificationResult, VerifyError>;

#[derive(Debug, Default)]
struct Script {
    outcomes: VecDeque<Outcome>,
}

impl Script {
    /// Next outcome; the last one repeats forever
    fn next(&mut self) -> Option<Outcome> {
        if self.outcomes.len() > 1 {
            self.outcomes.pop_front()
        } else {
            self.outcomes.front().cloned()
        }
    }
}

/// Mock verification source that never touches the network
///
/// Unscripted references answer with the default outcome (current, unless
/// configured otherwise). Clones share scripts and call counts.
///
/// # Examples
///
/// ```
/// use lexcheck_verify::{MockSource, StatuteSource};
/// use lexcheck_domain::{CanonicalReference, Jurisdiction};
///
/// let source = MockSource::new();
/// source.respond("29 C.F.R. § 1604.11", false);
///
/// let cfr = CanonicalReference::from_canonical("29 C.F.R. § 1604.11", Jurisdiction::Cfr);
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let result = runtime.block_on(source.lookup(&cfr)).unwrap();
/// assert!(!result.is_current);
/// assert_eq!(source.calls_for("29 C.F.R. § 1604.11"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockSource {
    default_outcome: Outcome,
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
    delay: Option<Duration>,
}

impl MockSource {
    /// A source that reports every reference as current
    pub fn new() -> Self {
        Self::with_default(Ok(VerificationResult {
            is_current: true,
            source_database: MOCK_SOURCE.to_string(),
            as_of: 0,
            checked_at: 0,
        }))
    }

    /// A source whose every call fails transiently
    pub fn unreachable() -> Self {
        Self::with_default(Err(VerifyError::Transient(
            "connection refused".to_string(),
        )))
    }

    /// A source with a custom answer for unscripted references
    pub fn with_default(outcome: Outcome) -> Self {
        Self {
            default_outcome: outcome,
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(HashMap::new())),
            delay: None,
        }
    }

    /// Sleep this long inside every lookup
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script a sequence of outcomes for one reference
    ///
    /// Outcomes are consumed in order; the last one repeats.
    pub fn script(&self, reference: &str, outcomes: impl IntoIterator<Item = Outcome>) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                reference.to_string(),
                Script {
                    outcomes: outcomes.into_iter().collect(),
                },
            );
    }

    /// Always answer `is_current` for one reference
    pub fn respond(&self, reference: &str, is_current: bool) {
        self.script(
            reference,
            [Ok(VerificationResult {
                is_current,
                source_database: MOCK_SOURCE.to_string(),
                as_of: 0,
                checked_at: 0,
            })],
        );
    }

    /// Always fail with `error` for one reference
    pub fn fail(&self, reference: &str, error: VerifyError) {
        self.script(reference, [Err(error)]);
    }

    /// Total number of lookups
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    /// Number of lookups for one reference
    pub fn calls_for(&self, reference: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .copied()
            .unwrap_or(0)
    }

    /// Reset all call counts
    pub fn reset_call_count(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatuteSource for MockSource {
    async fn lookup(
        &self,
        reference: &CanonicalReference,
    ) -> Result<VerificationResult, VerifyError> {
        let key = reference.as_str();
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(key)
            .and_then(Script::next);

        scripted
            .unwrap_or_else(|| self.default_outcome.clone())
            .map(|mut result| {
                let now = current_timestamp();
                // Unset currency dates default to the call time
                if result.as_of == 0 {
                    result.as_of = now;
                }
                result.checked_at = now;
                result
            })
    }

    fn name(&self) -> &str {
        MOCK_SOURCE
    }
}
