//! Label management handlers.

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::AuthAccount;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Request body for label mutations.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LabelsRequest {
    /// Labels to add, remove or set.
    #[validate(length(min = 1, max = 50))]
    pub labels: Vec<String>,
}

/// Response carrying a document's label set.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLabelsResponse {
    /// Document id.
    pub document_id: Uuid,
    /// Current label set, deduplicated and sorted.
    pub labels: Vec<String>,
}

/// Response listing the caller's distinct labels.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelListResponse {
    /// Distinct labels across the caller's documents.
    pub labels: Vec<String>,
}

/// Returns the label management routes.
pub(crate) fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/labels", get(list_labels))
        .route(
            "/documents/{document_id}/labels",
            get(get_document_labels)
                .post(add_document_labels)
                .delete(remove_document_labels)
                .put(set_document_labels),
        )
}

/// Lists all distinct labels across the caller's documents.
async fn list_labels(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
) -> Result<Json<LabelListResponse>> {
    let labels = state
        .documents()
        .list_labels(claims.account_id)
        .await
        .map_err(Error::from)?;

    Ok(Json(LabelListResponse { labels }))
}

/// Returns the label set of an owned document.
async fn get_document_labels(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DocumentLabelsResponse>> {
    let document = state
        .documents()
        .find_owned_document(claims.account_id, document_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("document").into_static())?;

    Ok(Json(DocumentLabelsResponse {
        document_id,
        labels: document.labels,
    }))
}

/// Adds labels to an owned document; duplicates collapse.
async fn add_document_labels(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Path(document_id): Path<Uuid>,
    Json(request): Json<LabelsRequest>,
) -> Result<Json<DocumentLabelsResponse>> {
    validate_labels(&request)?;

    let document = state
        .documents()
        .find_owned_document(claims.account_id, document_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("document").into_static())?;

    let mut labels: BTreeSet<String> = document.labels.into_iter().collect();
    labels.extend(request.labels);

    replace_labels(&state, claims.account_id, document_id, labels.into_iter().collect()).await
}

/// Removes labels from an owned document.
async fn remove_document_labels(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Path(document_id): Path<Uuid>,
    Json(request): Json<LabelsRequest>,
) -> Result<Json<DocumentLabelsResponse>> {
    validate_labels(&request)?;

    let document = state
        .documents()
        .find_owned_document(claims.account_id, document_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("document").into_static())?;

    let labels: Vec<String> = document
        .labels
        .into_iter()
        .filter(|label| !request.labels.contains(label))
        .collect();

    replace_labels(&state, claims.account_id, document_id, labels).await
}

/// Replaces the label set of an owned document.
async fn set_document_labels(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Path(document_id): Path<Uuid>,
    Json(request): Json<LabelsRequest>,
) -> Result<Json<DocumentLabelsResponse>> {
    validate_labels(&request)?;

    replace_labels(&state, claims.account_id, document_id, request.labels).await
}

async fn replace_labels(
    state: &ServiceState,
    account_id: Uuid,
    document_id: Uuid,
    labels: Vec<String>,
) -> Result<Json<DocumentLabelsResponse>> {
    let document = state
        .documents()
        .replace_labels(account_id, document_id, labels)
        .await
        .map_err(Error::from)?;

    Ok(Json(DocumentLabelsResponse {
        document_id,
        labels: document.labels,
    }))
}

fn validate_labels(request: &LabelsRequest) -> Result<()> {
    request.validate().map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid labels request")
            .with_context(err.to_string())
            .into_static()
    })
}
