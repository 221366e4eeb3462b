//! HTTP request handlers for the API service.
//!
//! Implements the statute and document endpoints using axum.

use crate::views::{
    DeleteResponse, ExtractBody, ExtractResponse, HealthResponse, Pagination, ReverifyResponse,
    StatutePage, StatuteView,
};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use lexcheck_domain::traits::{StatuteQuery, StatuteStore};
use lexcheck_domain::{DocumentId, StatuteId, VerificationStatus};
use lexcheck_extractor::{ExtractionRequest, Extractor, ExtractorError};
use lexcheck_store::{SqliteStore, StoreError};
use lexcheck_verify::StatuteSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Shared application state
pub struct AppState<S: StatuteSource> {
    /// Extraction and verification over the shared store
    pub extractor: Arc<Extractor<S, SqliteStore>>,
}

impl<S: StatuteSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<S: StatuteSource> AppState<S> {
    /// Wrap an extractor
    pub fn new(extractor: Arc<Extractor<S, SqliteStore>>) -> Self {
        Self { extractor }
    }

    /// Run one store operation under the lock
    fn with_store<T>(
        &self,
        op: impl FnOnce(&mut SqliteStore) -> Result<T, StoreError>,
    ) -> Result<T, ApiError> {
        let mut store = self
            .extractor
            .store()
            .lock()
            .map_err(|e| ApiError::Internal(format!("Store lock error: {}", e)))?;
        Ok(op(&mut store)?)
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Unknown document or statute
    #[error("{0}")]
    NotFound(String),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ExtractorError> for ApiError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::DocumentNotFound(_) | ExtractorError::UnknownStatute(_) => {
                ApiError::NotFound(e.to_string())
            }
            ExtractorError::InputDecoding(_) | ExtractorError::TextTooLong(_, _) => {
                ApiError::BadRequest(e.to_string())
            }
            ExtractorError::Store(_) | ExtractorError::Config(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DocumentNotFound(_) | StoreError::RecordNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

/// Query parameters of `GET /api/statutes`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Filter by owning document
    pub document_id: Option<i64>,
    /// Filter by currency flag
    pub is_current: Option<bool>,
    /// Filter by status label
    pub status: Option<String>,
    /// 1-based page number
    pub page: Option<usize>,
    /// Page size (at most 100)
    pub per_page: Option<usize>,
}

/// Query parameters of `GET /api/statutes/outdated`
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<usize>,
    /// Page size (at most 100)
    pub per_page: Option<usize>,
}

/// Run a paginated query
fn page_of<S: StatuteSource>(
    state: &AppState<S>,
    mut query: StatuteQuery,
) -> Result<StatutePage, ApiError> {
    query.page = Some(query.page());
    query.per_page = Some(query.per_page());

    let (records, total) =
        state.with_store(|store| Ok((store.query(&query)?, store.count(&query)?)))?;

    Ok(StatutePage {
        items: records.into_iter().map(StatuteView::from).collect(),
        pagination: Pagination::new(query.page(), query.per_page(), total),
    })
}

/// GET /health - Liveness and record count
async fn health_check<S: StatuteSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let statutes = state.with_store(|store| store.count(&StatuteQuery::default()))?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        statutes,
    }))
}

/// GET /api/statutes - Paginated list ordered by reference
async fn list_statutes<S: StatuteSource>(
    State(state): State<AppState<S>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<StatutePage>, ApiError> {
    let Query(params) = params?;

    let status = params
        .status
        .as_deref()
        .map(|s| {
            VerificationStatus::parse(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {}", s)))
        })
        .transpose()?;

    let query = StatuteQuery {
        document_id: params.document_id.map(DocumentId::new),
        is_current: params.is_current,
        status,
        page: params.page,
        per_page: params.per_page,
    };

    Ok(Json(page_of(&state, query)?))
}

/// GET /api/statutes/outdated - Records verified as no longer in force
async fn list_outdated<S: StatuteSource>(
    State(state): State<AppState<S>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<StatutePage>, ApiError> {
    let Query(params) = params?;
    let query = StatuteQuery {
        is_current: Some(false),
        page: params.page,
        per_page: params.per_page,
        ..Default::default()
    };
    Ok(Json(page_of(&state, query)?))
}

/// GET /api/statutes/:id - One record
async fn get_statute<S: StatuteSource>(
    State(state): State<AppState<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StatuteView>, ApiError> {
    let Path(id) = id?;
    let record = state
        .with_store(|store| store.get(StatuteId::new(id)))?
        .ok_or_else(|| ApiError::NotFound(format!("Statute record not found: {}", id)))?;
    Ok(Json(record.into()))
}

/// PUT /api/statutes/:id - Verify the record again
async fn reverify_statute<S: StatuteSource>(
    State(state): State<AppState<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReverifyResponse>, ApiError> {
    let Path(id) = id?;
    let outcome = state.extractor.reverify_by_id(StatuteId::new(id)).await?;
    info!("Re-verified statute {}: {}", id, outcome.message());
    Ok(Json(outcome.into()))
}

/// POST /api/documents/:id/extract - Register the document and run a pass
async fn extract_document<S: StatuteSource>(
    State(state): State<AppState<S>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ExtractBody>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let document_id = DocumentId::new(id);

    let label = body
        .label
        .unwrap_or_else(|| format!("document {}", document_id));
    state.with_store(|store| store.ensure_document(document_id, &label))?;

    let result = state
        .extractor
        .extract(ExtractionRequest {
            document_id,
            text: body.text,
        })
        .await?;
    Ok(Json(result.into()))
}

/// DELETE /api/documents/:id - Delete a document and its records
async fn delete_document<S: StatuteSource>(
    State(state): State<AppState<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    let document_id = DocumentId::new(id);

    let removed = state.with_store(|store| {
        if !store.document_exists(document_id)? {
            return Err(StoreError::DocumentNotFound(document_id));
        }
        store.delete_document(document_id)
    })?;

    info!("Deleted document {} with {} statute records", document_id, removed);
    Ok(Json(DeleteResponse {
        document_id: id,
        removed,
    }))
}

/// Create the axum router with all routes
pub fn create_router<S: StatuteSource + 'static>(state: AppState<S>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check::<S>))
        .route("/api/statutes", get(list_statutes::<S>))
        .route("/api/statutes/outdated", get(list_outdated::<S>))
        .route(
            "/api/statutes/:id",
            get(get_statute::<S>).put(reverify_statute::<S>),
        )
        .route("/api/documents/:id/extract", post(extract_document::<S>))
        .route(
            "/api/documents/:id",
            axum::routing::delete(delete_document::<S>),
        )
        .with_state(state)
}
