//! Shared rate-limit cooldown

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Pause shared by every call issued through one client
///
/// Tripping the gate makes all later `wait` calls sleep until the cooldown
/// ends. Overlapping trips keep the latest deadline.
#[derive(Debug, Default)]
pub struct CooldownGate {
    until: Mutex<Option<Instant>>,
}

impl CooldownGate {
    /// Create an open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate for `pause` from now
    pub fn trip(&self, pause: Duration) {
        let deadline = Instant::now() + pause;
        let mut until = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        if until.is_none_or(|current| current < deadline) {
            *until = Some(deadline);
        }
    }

    /// Remaining cooldown, if the gate is closed
    pub fn remaining(&self) -> Option<Duration> {
        let until = *self.until.lock().unwrap_or_else(PoisonError::into_inner);
        until
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .filter(|left| !left.is_zero())
    }

    /// Sleep until the gate is open
    pub async fn wait(&self) {
        // The deadline may move while we sleep
        while let Some(left) = self.remaining() {
            tokio::time::sleep(left).await;
        }
    }
}
