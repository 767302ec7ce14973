//! Document search handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::AuthAccount;
use crate::handler::{Error, ErrorKind, Result};
use crate::pipeline::retrieval::{self, SearchHit};
use crate::service::ServiceState;

/// Logging target for search handlers.
const TRACING_TARGET: &str = "docket_server::handler::search";

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}

/// Search request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsRequest {
    /// Free-text query.
    #[validate(length(min = 1, max = 1000))]
    pub query: String,
    /// Case selecting the namespace; defaults to the default case.
    #[validate(length(max = 200))]
    pub case_name: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

/// One ranked document in the search response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDocument {
    /// Document id.
    pub document_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Average relevance across matching chunks.
    pub score: f32,
    /// Number of chunk matches that contributed.
    pub chunk_hits: usize,
    /// Preview from the best-scoring chunk.
    pub preview: String,
    /// User-assigned labels.
    pub labels: Vec<String>,
    /// Document metadata.
    pub metadata: serde_json::Value,
    /// Upload timestamp.
    pub created_at: Timestamp,
}

impl From<SearchHit> for SearchResultDocument {
    fn from(hit: SearchHit) -> Self {
        Self {
            document_id: hit.document.id,
            file_name: hit.document.file_name,
            score: hit.score,
            chunk_hits: hit.chunk_hits,
            preview: hit.preview,
            labels: hit.document.labels,
            metadata: hit.document.metadata,
            created_at: hit.document.created_at,
        }
    }
}

/// Search response body.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsResponse {
    /// Ranked documents for the requested page.
    pub results: Vec<SearchResultDocument>,
    /// Total ranked documents before pagination.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
    /// Namespace that was queried.
    pub namespace: String,
    /// Processing time in milliseconds.
    pub elapsed_ms: u64,
}

/// Returns the search routes.
pub(crate) fn routes() -> Router<ServiceState> {
    Router::new().route("/documents/search", post(search_documents))
}

/// Ranks the caller's documents by relevance to a free-text query.
async fn search_documents(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Json(request): Json<SearchDocumentsRequest>,
) -> Result<Json<SearchDocumentsResponse>> {
    request.validate().map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid search request")
            .with_context(err.to_string())
            .into_static()
    })?;

    let outcome = retrieval::search(
        &state,
        claims.account_id,
        &request.query,
        request.case_name.as_deref(),
        request.page,
        request.per_page,
    )
    .await
    .map_err(|error| {
        tracing::error!(
            target: TRACING_TARGET,
            account_id = %claims.account_id,
            error = %error,
            "Search failed"
        );
        Error::from(error)
    })?;

    Ok(Json(SearchDocumentsResponse {
        results: outcome.hits.into_iter().map(Into::into).collect(),
        total: outcome.total,
        page: request.page.max(1),
        per_page: request.per_page,
        namespace: outcome.namespace,
        elapsed_ms: outcome.elapsed_ms,
    }))
}
