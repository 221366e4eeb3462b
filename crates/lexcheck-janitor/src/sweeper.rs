//! Core Sweeper implementation for re-verifying stale records

use crate::{JanitorError, SweepConfig, SweepMetrics};
use lexcheck_domain::current_timestamp;
use lexcheck_domain::traits::StatuteStore;
use lexcheck_extractor::Extractor;
use lexcheck_verify::StatuteSource;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

/// Sweeper service for keeping verifications from going stale
///
/// Each sweep re-verifies the records whose verification is older than
/// `stale_after_hours`, plus those never verified or left unresolved,
/// oldest first and at most `batch_limit` of them.
///
/// # Examples
///
/// ```no_run
/// use lexcheck_janitor::{SweepConfig, Sweeper};
/// use lexcheck_extractor::{Extractor, ExtractorConfig};
/// use lexcheck_store::SqliteStore;
/// use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("lexcheck.db")?;
/// let client = VerificationClient::new(MockSource::new(), ClientConfig::default())?;
/// let extractor = Arc::new(Extractor::new(client, store, ExtractorConfig::default())?);
///
/// let mut sweeper = Sweeper::new(extractor, SweepConfig::default())?;
/// let metrics = sweeper.sweep().await?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Sweeper<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
{
    extractor: Arc<Extractor<S, St>>,
    config: SweepConfig,
    metrics: SweepMetrics,
}

impl<S, St> Sweeper<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
    St::Error: Display,
{
    /// Create a new Sweeper with the given configuration
    pub fn new(extractor: Arc<Extractor<S, St>>, config: SweepConfig) -> Result<Self, JanitorError> {
        config.validate().map_err(JanitorError::Config)?;
        Ok(Self {
            extractor,
            config,
            metrics: SweepMetrics::new(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform one sweep cycle
    ///
    /// Returns the accumulated metrics after the sweep.
    pub async fn sweep(&mut self) -> Result<SweepMetrics, JanitorError> {
        let start = Instant::now();
        let cutoff = current_timestamp().saturating_sub(self.config.stale_after().as_secs());

        if self.config.dry_run {
            let stale = {
                let store = self
                    .extractor
                    .store()
                    .lock()
                    .map_err(|e| JanitorError::Store(format!("Store lock error: {}", e)))?;
                store
                    .list_stale(cutoff, Some(self.config.batch_limit))
                    .map_err(|e| JanitorError::Store(e.to_string()))?
            };

            for record in &stale {
                tracing::info!(
                    "DRY RUN: Would re-verify {} (document {}, status {})",
                    record.reference,
                    record.document_id,
                    record.status
                );
            }
            self.metrics.record_dry_run(stale.len());
        } else {
            let summary = self
                .extractor
                .reverify_stale(cutoff, Some(self.config.batch_limit))
                .await?;
            tracing::debug!("Sweep batch: {}", summary.describe());
            self.metrics.record_batch(&summary);
        }

        self.metrics.record_sweep();
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        Ok(self.metrics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcheck_domain::{
        CanonicalReference, DocumentId, Jurisdiction, VerificationResult, VerificationStatus,
    };
    use lexcheck_extractor::ExtractorConfig;
    use lexcheck_store::SqliteStore;
    use lexcheck_verify::{ClientConfig, MockSource, VerificationClient};

    const DAY: u64 = 86_400;

    fn reference(key: &str) -> CanonicalReference {
        CanonicalReference::from_canonical(key, Jurisdiction::UsCode)
    }

    /// Store with one document holding records verified `ages` days ago
    /// (`None` for never verified)
    fn create_test_extractor(
        source: MockSource,
        ages: &[(&str, Option<u64>)],
    ) -> Arc<Extractor<MockSource, SqliteStore>> {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let doc = DocumentId::new(1);
        store.ensure_document(doc, "brief.pdf").unwrap();

        for (key, age_days) in ages {
            store.upsert(doc, &reference(key), key, "").unwrap();
            if let Some(age_days) = age_days {
                let result = VerificationResult {
                    is_current: true,
                    source_database: "Archive".to_string(),
                    as_of: 0,
                    checked_at: current_timestamp() - age_days * DAY,
                };
                store.apply_verification(doc, &reference(key), &result).unwrap();
            }
        }

        let client = VerificationClient::new(source, ClientConfig::default()).unwrap();
        Arc::new(Extractor::new(client, store, ExtractorConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_sweep_reverifies_stale_records() {
        let source = MockSource::new();
        source.respond("42 U.S.C. § 1983", false);
        let extractor = create_test_extractor(
            source.clone(),
            &[
                ("42 U.S.C. § 1983", Some(45)),
                ("5 U.S.C. § 552", Some(1)),
                ("15 U.S.C. § 78j", None),
            ],
        );

        let mut sweeper = Sweeper::new(extractor.clone(), SweepConfig::default()).unwrap();
        let metrics = sweeper.sweep().await.unwrap();

        assert_eq!(metrics.sweep_count, 1);
        assert_eq!(metrics.checked, 2);
        assert_eq!(metrics.outdated, 1);
        assert_eq!(metrics.current, 1);
        assert_eq!(source.calls_for("5 U.S.C. § 552"), 0);

        let store = extractor.store().lock().unwrap();
        let record = store
            .find(DocumentId::new(1), &reference("42 U.S.C. § 1983"))
            .unwrap()
            .unwrap();
        assert_eq!(record.status, VerificationStatus::Outdated);
    }

    #[tokio::test]
    async fn test_batch_limit_takes_oldest_first() {
        let source = MockSource::new();
        let extractor = create_test_extractor(
            source.clone(),
            &[
                ("42 U.S.C. § 1983", Some(40)),
                ("5 U.S.C. § 552", Some(90)),
                ("15 U.S.C. § 78j", Some(60)),
            ],
        );

        let config = SweepConfig {
            batch_limit: 2,
            ..Default::default()
        };
        let mut sweeper = Sweeper::new(extractor, config).unwrap();
        let metrics = sweeper.sweep().await.unwrap();

        assert_eq!(metrics.checked, 2);
        assert_eq!(source.calls_for("5 U.S.C. § 552"), 1);
        assert_eq!(source.calls_for("15 U.S.C. § 78j"), 1);
        assert_eq!(source.calls_for("42 U.S.C. § 1983"), 0);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_call_source() {
        let source = MockSource::new();
        let extractor = create_test_extractor(
            source.clone(),
            &[("42 U.S.C. § 1983", Some(45)), ("5 U.S.C. § 552", None)],
        );

        let config = SweepConfig {
            dry_run: true,
            ..Default::default()
        };
        let mut sweeper = Sweeper::new(extractor, config).unwrap();
        let metrics = sweeper.sweep().await.unwrap();

        assert_eq!(metrics.would_check, 2);
        assert_eq!(metrics.checked, 0);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_metrics_accumulate_across_sweeps() {
        let source = MockSource::new();
        let extractor = create_test_extractor(source, &[("42 U.S.C. § 1983", Some(45))]);

        let mut sweeper = Sweeper::new(extractor, SweepConfig::default()).unwrap();
        sweeper.sweep().await.unwrap();
        let metrics = sweeper.sweep().await.unwrap();

        // The second sweep finds nothing stale
        assert_eq!(metrics.sweep_count, 2);
        assert_eq!(metrics.checked, 1);

        sweeper.reset_metrics();
        assert_eq!(sweeper.metrics().sweep_count, 0);
    }

    #[test]
    fn test_invalid_config() {
        let extractor = create_test_extractor(MockSource::new(), &[]);
        let config = SweepConfig {
            stale_after_hours: 0,
            ..Default::default()
        };
        assert!(matches!(
            Sweeper::new(extractor, config),
            Err(JanitorError::Config(_))
        ));
    }
}
