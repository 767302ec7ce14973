//! Document ingestion pipeline.
//!
//! One upload runs the stages strictly in sequence: validate, store the
//! raw blob, extract text (OCR fallback), chunk, embed, upsert vectors,
//! and only then persist the document record. A failure at any stage
//! aborts the upload without writing a document record; the already
//! uploaded blob is not rolled back and may be orphaned, which is logged
//! and accepted.

use std::time::Instant;

use bytes::Bytes;
use docket_core::extract::{extract_text_with_retry, meets_minimum_length};
use docket_core::types::CASE_NAME_KEY;
use docket_core::{
    Chunker, ContentKind, Document, DocumentChunk, Error, Namespace, OcrTranscriber, Result,
};
use docket_vector::{DistanceMetric, VectorData};
use uuid::Uuid;

use crate::service::ServiceState;

/// Logging target for the ingestion pipeline.
const TRACING_TARGET: &str = "docket_server::pipeline::ingestion";

/// One upload to ingest.
#[derive(Debug, Clone)]
pub struct IngestionRequest {
    /// Account performing the upload.
    pub account_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
    /// Free-form metadata; the `caseName` key selects the namespace.
    pub metadata: serde_json::Value,
}

/// Result of a completed ingestion.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    /// Generated document id.
    pub document_id: Uuid,
    /// Number of chunks indexed.
    pub chunk_count: usize,
    /// Characters of extracted text.
    pub character_count: usize,
    /// Blob storage URL of the original file.
    pub storage_url: String,
    /// Namespace the chunks were written into.
    pub namespace: String,
    /// Wall-clock processing time in milliseconds.
    pub elapsed_ms: u64,
}

/// Runs the ingestion pipeline for one upload.
pub async fn ingest(state: &ServiceState, request: IngestionRequest) -> Result<IngestionOutcome> {
    let started = Instant::now();
    let config = state.config();

    validate(state, &request)?;

    let document_id = Uuid::new_v4();
    let namespace = derive_namespace(state, &request.metadata);

    tracing::info!(
        target: TRACING_TARGET,
        document_id = %document_id,
        account_id = %request.account_id,
        file_name = %request.file_name,
        namespace = %namespace,
        size = %request.bytes.len(),
        "Starting ingestion"
    );

    // The blob goes out first so a durable URL exists for the document
    // record; on later failure it is left behind as an orphan.
    let storage_path = format!("{}/{}", document_id, sanitize_file_name(&request.file_name));
    let storage_url = state
        .objects()
        .put(&storage_path, request.bytes.clone())
        .await
        .map_err(Error::from)?;

    let text = extract_document_text(state, &request).await?;
    let character_count = text.chars().count();

    let chunker = Chunker::new(config.chunk_size, config.chunk_overlap);
    let chunks = chunker.chunk(&text, document_id);
    if chunks.is_empty() {
        return Err(Error::extraction("document produced no chunks"));
    }

    let chunk_texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
    let vectors = state.embedder().embed_chunks(&chunk_texts).await;

    state
        .vectors()
        .ensure_index(state.embedder().dimensions(), DistanceMetric::Cosine)
        .await
        .map_err(Error::from)?;

    let uploaded_at = jiff::Timestamp::now();
    let records = build_vector_records(&request, &chunks, &vectors, uploaded_at);

    state
        .vectors()
        .upsert(namespace.as_str(), records)
        .await
        .map_err(Error::from)?;

    let chunk_count = chunks.len();
    let document = Document {
        id: document_id,
        account_id: request.account_id,
        file_name: request.file_name.clone(),
        content_type: request.content_type.clone(),
        storage_url: storage_url.clone(),
        namespace: namespace.to_string(),
        chunk_count,
        character_count,
        labels: Vec::new(),
        metadata: request.metadata.clone(),
        created_at: uploaded_at,
    };

    state
        .documents()
        .insert_document(document, chunks)
        .await
        .map_err(Error::from)?;

    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        target: TRACING_TARGET,
        document_id = %document_id,
        chunk_count = %chunk_count,
        character_count = %character_count,
        elapsed_ms = %elapsed_ms,
        "Ingestion complete"
    );

    Ok(IngestionOutcome {
        document_id,
        chunk_count,
        character_count,
        storage_url,
        namespace: namespace.to_string(),
        elapsed_ms,
    })
}

/// Validates size and content type before any external call.
fn validate(state: &ServiceState, request: &IngestionRequest) -> Result<()> {
    let config = state.config();

    if request.bytes.is_empty() {
        return Err(Error::validation("uploaded file is empty"));
    }

    if request.bytes.len() > config.max_upload_bytes {
        return Err(Error::validation(format!(
            "file exceeds the maximum size of {} MB",
            config.max_upload_bytes / (1024 * 1024)
        )));
    }

    let kind = ContentKind::resolve(&request.content_type, &request.file_name);
    let explicitly_allowed = config
        .allowed_content_types
        .iter()
        .any(|allowed| allowed == &request.content_type);

    if kind == ContentKind::Unknown && !explicitly_allowed {
        return Err(Error::validation(format!(
            "unsupported file type: {}",
            request.content_type
        )));
    }

    Ok(())
}

/// Extracts text directly, falling back to OCR below the length threshold.
async fn extract_document_text(
    state: &ServiceState,
    request: &IngestionRequest,
) -> Result<String> {
    let kind = ContentKind::resolve(&request.content_type, &request.file_name);

    let extracted = match extract_text_with_retry(&request.bytes, kind).await {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                file_name = %request.file_name,
                error = %error,
                "Direct extraction failed, deferring to OCR"
            );
            String::new()
        }
    };

    if meets_minimum_length(&extracted) {
        return Ok(extracted);
    }

    tracing::debug!(
        target: TRACING_TARGET,
        file_name = %request.file_name,
        extracted_chars = %extracted.trim().chars().count(),
        "Extraction below threshold, running OCR"
    );

    // The transcription API needs file-handle semantics, so the upload is
    // spilled to a tempfile; RAII removes it on every exit path.
    let temp_file = tempfile::NamedTempFile::new()
        .map_err(|e| Error::storage("failed to create temporary file").with_source(e))?;
    tokio::fs::write(temp_file.path(), &request.bytes)
        .await
        .map_err(|e| Error::storage("failed to write temporary file").with_source(e))?;

    let transcribed = state
        .ai()
        .ocr
        .transcribe(temp_file.path(), &request.content_type)
        .await?;

    if transcribed.trim().is_empty() {
        return Err(Error::extraction(
            "no text could be extracted from the document",
        ));
    }

    Ok(transcribed)
}

fn derive_namespace(state: &ServiceState, metadata: &serde_json::Value) -> Namespace {
    metadata
        .get(CASE_NAME_KEY)
        .and_then(|value| value.as_str())
        .map(Namespace::derive)
        .unwrap_or_else(|| Namespace::derive(&state.config().default_case_name))
}

fn build_vector_records(
    request: &IngestionRequest,
    chunks: &[DocumentChunk],
    vectors: &[Vec<f32>],
    uploaded_at: jiff::Timestamp,
) -> Vec<VectorData> {
    chunks
        .iter()
        .zip(vectors)
        .map(|(chunk, vector)| {
            VectorData::new(chunk.vector_id(), vector.clone())
                .with_field("content", serde_json::json!(chunk.content))
                .with_field("document_id", serde_json::json!(chunk.document_id))
                .with_field("chunk_index", serde_json::json!(chunk.index))
                .with_field("file_name", serde_json::json!(request.file_name))
                .with_field("file_type", serde_json::json!(request.content_type))
                .with_field("account_id", serde_json::json!(request.account_id))
                .with_field("uploaded_at", serde_json::json!(uploaded_at.to_string()))
        })
        .collect()
}

fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized_for_storage_paths() {
        assert_eq!(sanitize_file_name("a/b\\c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
