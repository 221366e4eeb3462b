//! Background worker for continuous sweep operation

use crate::{JanitorError, SweepMetrics, Sweeper};
use lexcheck_domain::traits::StatuteStore;
use lexcheck_verify::StatuteSource;
use std::fmt::Display;
use tokio::time::{interval, Duration};

/// Background worker that runs the Sweeper on a schedule
///
/// # Examples
///
/// ```no_run
/// use lexcheck_janitor::{SweepConfig, SweepWorker, Sweeper};
/// use lexcheck_extractor::{Extractor, ExtractorConfig};
/// use lexcheck_store::SqliteStore;
/// use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("lexcheck.db")?;
///     let client = VerificationClient::new(MockSource::new(), ClientConfig::default())?;
///     let extractor = Arc::new(Extractor::new(client, store, ExtractorConfig::default())?);
///     let mut worker = SweepWorker::new(Sweeper::new(extractor, SweepConfig::default())?);
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run().await?;
///     Ok(())
/// }
/// ```
pub struct SweepWorker<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
{
    sweeper: Sweeper<S, St>,
    interval: Duration,
}

impl<S, St> SweepWorker<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
    St::Error: Display,
{
    /// Create a new background worker ticking at the sweeper's interval
    pub fn new(sweeper: Sweeper<S, St>) -> Self {
        let interval = sweeper.config().sweep_interval();
        Self { sweeper, interval }
    }

    /// Override the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&mut self) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);

        tracing::info!("Sweep worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting sweep cycle");

                    match self.sweeper.sweep().await {
                        Ok(metrics) => {
                            tracing::info!(
                                "Sweep completed: {} re-verified, {} outdated, {} unresolved",
                                metrics.checked,
                                metrics.outdated,
                                metrics.unresolved
                            );
                        }
                        Err(e) => {
                            tracing::error!("Sweep failed: {}", e);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping sweep worker");
                    break;
                }
            }
        }

        tracing::info!(
            "Sweep worker stopped. Final metrics:\n{}",
            self.sweeper.metrics().summary()
        );

        Ok(())
    }

    /// Run for a specific number of cycles
    ///
    /// Stops at the first failed sweep.
    pub async fn run_cycles(&mut self, cycles: usize) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Sweep worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);

            match self.sweeper.sweep().await {
                Ok(metrics) => {
                    tracing::info!(
                        "Sweep {}/{} completed: {} re-verified so far",
                        cycle + 1,
                        cycles,
                        metrics.checked
                    );
                }
                Err(e) => {
                    tracing::error!("Sweep {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Sweep worker finished {} cycles. Final metrics:\n{}",
            cycles,
            self.sweeper.metrics().summary()
        );

        Ok(())
    }

    /// Get a reference to the sweeper's current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        self.sweeper.metrics()
    }

    /// Reset the sweeper's metrics counters
    pub fn reset_metrics(&mut self) {
        self.sweeper.reset_metrics();
    }
}
