//! TTL cache of successful verification results

use lexcheck_domain::VerificationResult;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Successful results keyed by canonical reference string
///
/// Failures are never cached. A zero TTL disables the cache.
#[derive(Debug)]
pub struct VerificationCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (VerificationResult, Instant)>>,
}

impl VerificationCache {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for a key, evicting it if expired
    pub fn get(&self, key: &str) -> Option<VerificationResult> {
        if self.ttl.is_zero() {
            return None;
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some((result, stored)) if stored.elapsed() < self.ttl => Some(result.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a successful result
    pub fn insert(&self, key: &str, result: VerificationResult) {
        if self.ttl.is_zero() {
            return;
        }

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), (result, Instant::now()));
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
