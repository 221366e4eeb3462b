//! Lexcheck Storage Layer
//!
//! Implements the `StatuteStore` trait on SQLite.
//!
//! # Architecture
//!
//! - `documents` table: owners registered by the upload layer
//! - `statutes` table: one row per `(document_id, reference)` pair, enforced
//!   by a unique constraint, removed by `ON DELETE CASCADE`
//!
//! Concurrent upserts of the same pair resolve to the first writer's row
//! because creation is `INSERT … ON CONFLICT DO NOTHING` followed by a read
//! in the same transaction.
//!
//! # Examples
//!
//! ```no_run
//! use lexcheck_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for statute record operations
//! ```

#![warn(missing_docs)]

use lexcheck_domain::traits::{ApplyOutcome, StatuteQuery, StatuteStore, UpsertOutcome};
use lexcheck_domain::{
    current_timestamp, CanonicalReference, DocumentId, Jurisdiction, StatuteId, StatuteRecord,
    VerificationResult, VerificationStatus,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Verification written for a pair that was never upserted
    #[error("No statute record for document {document_id} and reference '{reference}'")]
    RecordNotFound {
        /// Owning document
        document_id: DocumentId,
        /// Canonical key
        reference: String,
    },

    /// Upsert for a document that is not registered
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const RECORD_COLUMNS: &str = "id, document_id, reference, jurisdiction, display_text, excerpt, \
     status, is_current, verified_at, source_database, last_checked_at, last_error, created_at";

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based implementation of StatuteStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store between tasks as
/// `Arc<Mutex<SqliteStore>>`, or give each thread its own instance on the
/// same database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lexcheck_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("lexcheck.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn document_exists_in(conn: &Connection, id: DocumentId) -> Result<bool, StoreError> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM documents WHERE id = ?1",
                params![id.value()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn find_pair(
        conn: &Connection,
        document_id: DocumentId,
        reference: &str,
    ) -> Result<Option<StatuteRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM statutes WHERE document_id = ?1 AND reference = ?2",
            RECORD_COLUMNS
        );
        let record = conn
            .query_row(&sql, params![document_id.value(), reference], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    fn require_pair(
        conn: &Connection,
        document_id: DocumentId,
        reference: &str,
    ) -> Result<StatuteRecord, StoreError> {
        Self::find_pair(conn, document_id, reference)?.ok_or_else(|| StoreError::RecordNotFound {
            document_id,
            reference: reference.to_string(),
        })
    }

    /// Convert a result row to a StatuteRecord
    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatuteRecord> {
        let jurisdiction_str: String = row.get(3)?;
        let jurisdiction = Jurisdiction::parse(&jurisdiction_str).ok_or_else(|| {
            conversion_error(3, format!("Unknown jurisdiction: {}", jurisdiction_str))
        })?;

        let status_str: String = row.get(6)?;
        let status = VerificationStatus::parse(&status_str)
            .ok_or_else(|| conversion_error(6, format!("Unknown status: {}", status_str)))?;

        let verified_at: Option<i64> = row.get(8)?;
        let last_checked_at: Option<i64> = row.get(10)?;

        Ok(StatuteRecord {
            id: StatuteId::new(row.get(0)?),
            document_id: DocumentId::new(row.get(1)?),
            reference: row.get(2)?,
            jurisdiction,
            display_text: row.get(4)?,
            excerpt: row.get(5)?,
            status,
            is_current: row.get(7)?,
            verified_at: verified_at.map(|t| t as u64),
            source_database: row.get(9)?,
            last_checked_at: last_checked_at.map(|t| t as u64),
            last_error: row.get(11)?,
            created_at: row.get::<_, i64>(12)? as u64,
        })
    }

    /// Append the WHERE clause for a query
    fn push_filters(
        query: &StatuteQuery,
        sql: &mut String,
        params: &mut Vec<Box<dyn rusqlite::ToSql>>,
    ) {
        if let Some(document_id) = query.document_id {
            sql.push_str(" AND document_id = ?");
            params.push(Box::new(document_id.value()));
        }

        if let Some(is_current) = query.is_current {
            sql.push_str(" AND is_current = ?");
            params.push(Box::new(is_current));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(StoreError::InvalidData(message)),
    )
}

impl StatuteStore for SqliteStore {
    type Error = StoreError;

    fn ensure_document(&mut self, id: DocumentId, label: &str) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO documents (id, label, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO NOTHING",
            params![id.value(), label, current_timestamp() as i64],
        )?;
        Ok(())
    }

    fn document_exists(&self, id: DocumentId) -> Result<bool, Self::Error> {
        Self::document_exists_in(&self.conn, id)
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<usize, Self::Error> {
        let tx = self.conn.transaction()?;

        let removed: i64 = tx.query_row(
            "SELECT COUNT(*) FROM statutes WHERE document_id = ?1",
            params![id.value()],
            |row| row.get(0),
        )?;
        tx.execute("DELETE FROM documents WHERE id = ?1", params![id.value()])?;
        tx.commit()?;

        debug!("Deleted document {} with {} statute records", id, removed);
        Ok(removed as usize)
    }

    fn upsert(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        display_text: &str,
        excerpt: &str,
    ) -> Result<UpsertOutcome, Self::Error> {
        let tx = self.conn.transaction()?;

        if !Self::document_exists_in(&tx, document_id)? {
            return Err(StoreError::DocumentNotFound(document_id));
        }

        let inserted = tx.execute(
            "INSERT INTO statutes (document_id, reference, jurisdiction, display_text, excerpt, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(document_id, reference) DO NOTHING",
            params![
                document_id.value(),
                reference.as_str(),
                reference.jurisdiction().as_str(),
                display_text,
                excerpt,
                VerificationStatus::Unverified.as_str(),
                current_timestamp() as i64,
            ],
        )?;
        let created = inserted == 1;

        if !created {
            let existing = Self::require_pair(&tx, document_id, reference.as_str())?;
            if display_text.chars().count() > existing.display_text.chars().count() {
                tx.execute(
                    "UPDATE statutes SET display_text = ?1, excerpt = ?2 WHERE id = ?3",
                    params![display_text, excerpt, existing.id.value()],
                )?;
            }
        }

        let record = Self::require_pair(&tx, document_id, reference.as_str())?;
        tx.commit()?;

        Ok(UpsertOutcome { record, created })
    }

    fn apply_verification(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        result: &VerificationResult,
    ) -> Result<ApplyOutcome, Self::Error> {
        let tx = self.conn.transaction()?;

        if !Self::document_exists_in(&tx, document_id)? {
            return Ok(ApplyOutcome::DocumentGone);
        }

        let status = VerificationStatus::from_is_current(result.is_current);
        let updated = tx.execute(
            "UPDATE statutes
             SET status = ?1, is_current = ?2, verified_at = ?3, source_database = ?4,
                 last_checked_at = ?3, last_error = NULL
             WHERE document_id = ?5 AND reference = ?6",
            params![
                status.as_str(),
                result.is_current,
                result.checked_at as i64,
                result.source_database,
                document_id.value(),
                reference.as_str(),
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::RecordNotFound {
                document_id,
                reference: reference.as_str().to_string(),
            });
        }

        let record = Self::require_pair(&tx, document_id, reference.as_str())?;
        tx.commit()?;

        Ok(ApplyOutcome::Applied(record))
    }

    fn record_failure(
        &mut self,
        document_id: DocumentId,
        reference: &CanonicalReference,
        reason: &str,
        checked_at: u64,
    ) -> Result<ApplyOutcome, Self::Error> {
        let tx = self.conn.transaction()?;

        if !Self::document_exists_in(&tx, document_id)? {
            return Ok(ApplyOutcome::DocumentGone);
        }

        // Verified records keep their last answer
        let updated = tx.execute(
            "UPDATE statutes
             SET status = CASE WHEN status IN ('current', 'outdated') THEN status ELSE 'unresolved' END,
                 last_checked_at = ?1, last_error = ?2
             WHERE document_id = ?3 AND reference = ?4",
            params![
                checked_at as i64,
                reason,
                document_id.value(),
                reference.as_str(),
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::RecordNotFound {
                document_id,
                reference: reference.as_str().to_string(),
            });
        }

        let record = Self::require_pair(&tx, document_id, reference.as_str())?;
        tx.commit()?;

        Ok(ApplyOutcome::Applied(record))
    }

    fn get(&self, id: StatuteId) -> Result<Option<StatuteRecord>, Self::Error> {
        let sql = format!("SELECT {} FROM statutes WHERE id = ?1", RECORD_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, params![id.value()], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    fn find(
        &self,
        document_id: DocumentId,
        reference: &CanonicalReference,
    ) -> Result<Option<StatuteRecord>, Self::Error> {
        Self::find_pair(&self.conn, document_id, reference.as_str())
    }

    fn list_by_document(&self, document_id: DocumentId) -> Result<Vec<StatuteRecord>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM statutes WHERE document_id = ?1 ORDER BY id",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![document_id.value()], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn list_stale(
        &self,
        older_than: u64,
        limit: Option<usize>,
    ) -> Result<Vec<StatuteRecord>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM statutes
             WHERE verified_at IS NULL OR verified_at < ?1
             ORDER BY COALESCE(verified_at, 0), id
             LIMIT ?2",
            RECORD_COLUMNS
        );
        // LIMIT -1 means no limit in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![older_than as i64, limit], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn query(&self, query: &StatuteQuery) -> Result<Vec<StatuteRecord>, Self::Error> {
        let mut sql = format!("SELECT {} FROM statutes WHERE 1=1", RECORD_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        Self::push_filters(query, &mut sql, &mut params);
        sql.push_str(" ORDER BY reference, id");

        if query.is_paginated() {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Box::new(query.per_page() as i64));
            params.push(Box::new(i64::try_from(query.offset()).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let records = stmt
            .query_map(&param_refs[..], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn count(&self, query: &StatuteQuery) -> Result<usize, Self::Error> {
        let mut sql = String::from("SELECT COUNT(*) FROM statutes WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        Self::push_filters(query, &mut sql, &mut params);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let count: i64 = self
            .conn
            .query_row(&sql, &param_refs[..], |row| row.get(0))?;
        Ok(count as usize)
    }
}
