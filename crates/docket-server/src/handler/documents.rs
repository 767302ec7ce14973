//! Document ingestion handlers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::AuthAccount;
use crate::handler::{Error, ErrorKind, Result};
use crate::pipeline::ingestion::{self, IngestionOutcome, IngestionRequest};
use crate::service::ServiceState;

/// Logging target for document handlers.
const TRACING_TARGET: &str = "docket_server::handler::documents";

/// Response returned after a successful ingestion.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentResponse {
    /// Generated document id.
    pub document_id: Uuid,
    /// Number of chunks indexed.
    pub chunk_count: usize,
    /// Characters of extracted text.
    pub character_count: usize,
    /// Blob storage URL of the original file.
    pub storage_url: String,
    /// Namespace the document was written into.
    pub namespace: String,
    /// Processing time in milliseconds.
    pub elapsed_ms: u64,
}

impl From<IngestionOutcome> for UploadDocumentResponse {
    fn from(outcome: IngestionOutcome) -> Self {
        Self {
            document_id: outcome.document_id,
            chunk_count: outcome.chunk_count,
            character_count: outcome.character_count,
            storage_url: outcome.storage_url,
            namespace: outcome.namespace,
            elapsed_ms: outcome.elapsed_ms,
        }
    }
}

/// Returns the document ingestion routes.
pub(crate) fn routes() -> Router<ServiceState> {
    Router::new().route("/documents", post(upload_document))
}

/// Ingests one uploaded file.
///
/// Expects a multipart request with a `file` part and an optional
/// `metadata` JSON part whose `caseName` key selects the namespace.
async fn upload_document(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadDocumentResponse>)> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut metadata = serde_json::json!({});

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(format!("failed to parse multipart form: {err}"))
            .into_static()
    })? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let bytes = field.bytes().await.map_err(|err| {
                    ErrorKind::BadRequest
                        .with_message("Failed to read file data")
                        .with_context(err.to_string())
                        .into_static()
                })?;

                file = Some((file_name, content_type, bytes));
            }
            Some("metadata") => {
                let text = field.text().await.map_err(|err| {
                    ErrorKind::BadRequest
                        .with_message("Failed to read metadata field")
                        .with_context(err.to_string())
                        .into_static()
                })?;

                metadata = serde_json::from_str(&text).map_err(|err| {
                    ErrorKind::BadRequest
                        .with_message("Invalid metadata JSON")
                        .with_context(err.to_string())
                        .into_static()
                })?;
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Err(ErrorKind::BadRequest.with_message("No file provided in multipart request"));
    };

    let outcome = ingestion::ingest(
        &state,
        IngestionRequest {
            account_id: claims.account_id,
            file_name,
            content_type,
            bytes,
            metadata,
        },
    )
    .await
    .map_err(|error| {
        tracing::error!(
            target: TRACING_TARGET,
            account_id = %claims.account_id,
            error = %error,
            "Ingestion failed"
        );
        Error::from(error)
    })?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}
