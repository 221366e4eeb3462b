//! Metrics collection for sweep operations

use lexcheck_domain::ExtractionSummary;

/// Metrics collected across sweep cycles
///
/// Counters accumulate until [`SweepMetrics::reset`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepMetrics {
    /// Total sweep cycles completed
    pub sweep_count: usize,

    /// Records sent to the source
    pub checked: usize,

    /// Records found current
    pub current: usize,

    /// Records found outdated
    pub outdated: usize,

    /// Records the source could not resolve
    pub unresolved: usize,

    /// Results dropped because the owning document was deleted
    pub discarded: usize,

    /// Records a dry run would have re-verified
    pub would_check: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one re-verification batch
    pub fn record_batch(&mut self, summary: &ExtractionSummary) {
        self.checked += summary.total + summary.discarded;
        self.current += summary.current;
        self.outdated += summary.outdated;
        self.unresolved += summary.unresolved;
        self.discarded += summary.discarded;
    }

    /// Record records found stale during a dry run
    pub fn record_dry_run(&mut self, count: usize) {
        self.would_check += count;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Re-verified: {}", self.checked),
            format!("  Current: {}", self.current),
            format!("  Outdated: {}", self.outdated),
            format!("  Unresolved: {}", self.unresolved),
            format!("  Discarded: {}", self.discarded),
        ];

        if self.would_check > 0 {
            lines.push(String::new());
            lines.push(format!("Dry run, would re-verify: {}", self.would_check));
        }

        lines.join("\n")
    }
}
