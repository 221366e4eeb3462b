//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::matcher::{decode_text, excerpt, CitationMatcher};
use crate::normalizer::normalize;
use crate::types::{
    ExtractionFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult, ReverifyOutcome,
    VerificationOutcome,
};
use futures::stream::{self, StreamExt};
use lexcheck_domain::traits::{ApplyOutcome, StatuteStore};
use lexcheck_domain::{
    current_timestamp, CanonicalReference, DocumentId, ExtractionSummary, StatuteId,
    StatuteRecord, VerificationResult,
};
use lexcheck_verify::{StatuteSource, VerificationClient, VerifyError};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The Extractor finds statute references in documents and verifies them
pub struct Extractor<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
{
    client: Arc<VerificationClient<S>>,
    store: Arc<Mutex<St>>,
    matcher: CitationMatcher,
    config: ExtractorConfig,
}

/// Best display form seen so far for one canonical reference
struct Occurrence {
    reference: CanonicalReference,
    display_text: String,
    excerpt: String,
}

/// What a batch of verifications did to the store
#[derive(Default)]
struct BatchOutcome {
    records: Vec<StatuteRecord>,
    verified: usize,
    discarded: usize,
}

impl<S, St> Extractor<S, St>
where
    S: StatuteSource,
    St: StatuteStore,
    St::Error: Display,
{
    /// Create a new Extractor owning its client and store
    pub fn new(
        client: VerificationClient<S>,
        store: St,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        Self::from_shared(Arc::new(client), Arc::new(Mutex::new(store)), config)
    }

    /// Create an Extractor over a client and store shared with other tasks
    pub fn from_shared(
        client: Arc<VerificationClient<S>>,
        store: Arc<Mutex<St>>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            client,
            store,
            matcher: CitationMatcher::new(),
            config,
        })
    }

    /// Replace the citation matcher
    pub fn with_matcher(mut self, matcher: CitationMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// The shared statute store
    pub fn store(&self) -> &Arc<Mutex<St>> {
        &self.store
    }

    /// The shared verification client
    pub fn client(&self) -> &Arc<VerificationClient<S>> {
        &self.client
    }

    /// The extractor configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run one store operation under the lock
    fn with_store<T>(
        &self,
        op: impl FnOnce(&mut St) -> Result<T, St::Error>,
    ) -> Result<T, ExtractorError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| ExtractorError::Store(format!("Store lock error: {}", e)))?;
        op(&mut store).map_err(|e| ExtractorError::Store(e.to_string()))
    }

    /// Extract statute references from raw document bytes
    pub async fn extract_bytes(
        &self,
        document_id: DocumentId,
        bytes: &[u8],
    ) -> Result<ExtractionResult, ExtractorError> {
        let text = decode_text(bytes)?;
        self.extract(ExtractionRequest {
            document_id,
            text: text.to_string(),
        })
        .await
    }

    /// Extract statute references from a document and verify them
    ///
    /// Records are created in discovery order. Only records without a
    /// fresh verification are sent to the source; at most
    /// `max_concurrency` calls are in flight. Re-running on unchanged text
    /// creates nothing and leaves fresh records untouched.
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start_time = Instant::now();
        let timestamp = current_timestamp();
        let document_id = request.document_id;
        let text = request.text.as_str();

        if !self.with_store(|store| store.document_exists(document_id))? {
            return Err(ExtractorError::DocumentNotFound(document_id));
        }

        if text.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text.len(),
                self.config.max_text_length,
            ));
        }

        info!(
            "Starting extraction for document {}, text length {}",
            document_id,
            text.len()
        );

        // Match, normalize, and keep the longest display form per reference
        let mut matches_found = 0;
        let mut failures = Vec::new();
        let mut occurrences: Vec<Occurrence> = Vec::new();
        let mut positions: HashMap<CanonicalReference, usize> = HashMap::new();

        for found in self.matcher.matches(text) {
            matches_found += 1;

            let reference = match normalize(found.text, found.jurisdiction) {
                Ok(reference) => reference,
                Err(e) => {
                    warn!("Dropping citation: {}", e);
                    failures.push(ExtractionFailure {
                        reason: e.to_string(),
                        raw_text: found.text.to_string(),
                    });
                    continue;
                }
            };

            match positions.get(&reference) {
                Some(&index) => {
                    let seen = &mut occurrences[index];
                    if found.text.chars().count() > seen.display_text.chars().count() {
                        seen.display_text = found.text.to_string();
                        seen.excerpt = excerpt(
                            text,
                            found.start,
                            found.end,
                            self.config.excerpt_context_chars,
                        );
                    }
                }
                None => {
                    positions.insert(reference.clone(), occurrences.len());
                    occurrences.push(Occurrence {
                        reference,
                        display_text: found.text.to_string(),
                        excerpt: excerpt(
                            text,
                            found.start,
                            found.end,
                            self.config.excerpt_context_chars,
                        ),
                    });
                }
            }
        }

        debug!(
            "Found {} matches, {} unique references, {} dropped",
            matches_found,
            occurrences.len(),
            failures.len()
        );

        let mut created = 0;
        let mut records = Vec::with_capacity(occurrences.len());
        self.with_store(|store| {
            for occurrence in &occurrences {
                let outcome = store.upsert(
                    document_id,
                    &occurrence.reference,
                    &occurrence.display_text,
                    &occurrence.excerpt,
                )?;
                if outcome.created {
                    created += 1;
                }
                records.push(outcome.record);
            }
            Ok(())
        })?;

        let now = current_timestamp();
        let due: Vec<(DocumentId, CanonicalReference)> = records
            .iter()
            .filter(|record| record.needs_verification(now, self.config.stale_after_secs))
            .map(|record| (record.document_id, record.canonical_reference()))
            .collect();
        let skipped_fresh = records.len() - due.len();

        let batch = self.verify_batch(due, false).await?;
        for updated in batch.records {
            if let Some(&index) = positions.get(&updated.canonical_reference()) {
                records[index] = updated;
            }
        }

        let mut summary = ExtractionSummary::from_records(&records);
        summary.created = created;
        summary.verified = batch.verified;
        summary.skipped_fresh = skipped_fresh;
        summary.discarded = batch.discarded;

        let metadata = ExtractionMetadata {
            pass_id: Uuid::now_v7(),
            document_id,
            timestamp,
            matches_found,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction complete for document {}: {} ({} created, {} verified, {} fresh, {} discarded)",
            document_id,
            summary.describe(),
            summary.created,
            summary.verified,
            summary.skipped_fresh,
            summary.discarded
        );

        Ok(ExtractionResult {
            summary,
            records,
            failures,
            metadata,
        })
    }

    /// Verify one record again, bypassing cached answers
    pub async fn reverify(
        &self,
        document_id: DocumentId,
        reference: &CanonicalReference,
    ) -> Result<ReverifyOutcome, ExtractorError> {
        if self
            .with_store(|store| store.find(document_id, reference))?
            .is_none()
        {
            return Err(ExtractorError::UnknownStatute(format!(
                "{} in document {}",
                reference, document_id
            )));
        }

        info!("Re-verifying {} for document {}", reference, document_id);

        let result = self.client.verify_fresh(reference).await;
        let (record, outcome) = self.apply(document_id, reference, result)?;
        Ok(ReverifyOutcome { record, outcome })
    }

    /// Verify the record with the given storage ID again
    pub async fn reverify_by_id(&self, id: StatuteId) -> Result<ReverifyOutcome, ExtractorError> {
        let record = self
            .with_store(|store| store.get(id))?
            .ok_or_else(|| ExtractorError::UnknownStatute(id.to_string()))?;
        self.reverify(record.document_id, &record.canonical_reference())
            .await
    }

    /// Re-verify records never verified or verified before `older_than`
    ///
    /// Oldest first, at most `limit` records. The summary counts the
    /// records still present afterwards.
    pub async fn reverify_stale(
        &self,
        older_than: u64,
        limit: Option<usize>,
    ) -> Result<ExtractionSummary, ExtractorError> {
        let stale = self.with_store(|store| store.list_stale(older_than, limit))?;
        if stale.is_empty() {
            debug!("No stale records");
            return Ok(ExtractionSummary::default());
        }

        info!("Re-verifying {} stale records", stale.len());

        let targets = stale
            .iter()
            .map(|record| (record.document_id, record.canonical_reference()))
            .collect();
        let batch = self.verify_batch(targets, true).await?;

        let mut summary = ExtractionSummary::from_records(&batch.records);
        summary.verified = batch.verified;
        summary.discarded = batch.discarded;
        Ok(summary)
    }

    /// Verify references with bounded concurrency, applying each result as
    /// it arrives
    async fn verify_batch(
        &self,
        targets: Vec<(DocumentId, CanonicalReference)>,
        fresh: bool,
    ) -> Result<BatchOutcome, ExtractorError> {
        let mut batch = BatchOutcome::default();
        if targets.is_empty() {
            return Ok(batch);
        }

        let client = &self.client;
        let mut calls = stream::iter(targets)
            .map(|(document_id, reference)| async move {
                let result = if fresh {
                    client.verify_fresh(&reference).await
                } else {
                    client.verify(&reference).await
                };
                (document_id, reference, result)
            })
            .buffer_unordered(self.config.max_concurrency);

        while let Some((document_id, reference, result)) = calls.next().await {
            let (record, outcome) = self.apply(document_id, &reference, result)?;
            match outcome {
                VerificationOutcome::Verified => batch.verified += 1,
                VerificationOutcome::Discarded => batch.discarded += 1,
                VerificationOutcome::Failed(_) => {}
            }
            batch.records.extend(record);
        }

        Ok(batch)
    }

    /// Write one verification outcome to its record
    fn apply(
        &self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        result: Result<VerificationResult, VerifyError>,
    ) -> Result<(Option<StatuteRecord>, VerificationOutcome), ExtractorError> {
        let (applied, outcome) = match result {
            Ok(result) => {
                let applied =
                    self.with_store(|store| store.apply_verification(document_id, reference, &result))?;
                (applied, VerificationOutcome::Verified)
            }
            Err(error) => {
                warn!("Verification of {} failed: {}", reference, error);
                let reason = error.to_string();
                let applied = self.with_store(|store| {
                    store.record_failure(document_id, reference, &reason, current_timestamp())
                })?;
                (applied, VerificationOutcome::Failed(error))
            }
        };

        Ok(match applied {
            ApplyOutcome::Applied(record) => {
                debug!("{} is now {}", record.reference, record.status);
                (Some(record), outcome)
            }
            ApplyOutcome::DocumentGone => {
                debug!(
                    "Document {} is gone, discarding result for {}",
                    document_id, reference
                );
                (None, VerificationOutcome::Discarded)
            }
        })
    }
}
