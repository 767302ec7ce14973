//! Document chunk model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::document_chunks;

/// Chunk record as stored in the database.
///
/// Embedding vectors live in the vector index only; the metadata store
/// keeps the chunk text and offsets for inspection and previews.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentChunk {
    /// Unique chunk record identifier.
    pub id: Uuid,
    /// Parent document identifier.
    pub document_id: Uuid,
    /// Zero-based sequence index within the document.
    pub chunk_index: i32,
    /// Chunk text content.
    pub content: String,
    /// Starting character offset in the extracted text.
    pub start_char: i32,
    /// Ending character offset.
    pub end_char: i32,
    /// Timestamp when the chunk was created.
    pub created_at: Timestamp,
}

/// Data for creating a new chunk record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentChunk {
    /// Parent document identifier.
    pub document_id: Uuid,
    /// Zero-based sequence index.
    pub chunk_index: i32,
    /// Chunk text content.
    pub content: String,
    /// Starting character offset.
    pub start_char: i32,
    /// Ending character offset.
    pub end_char: i32,
}

impl From<DocumentChunk> for docket_core::DocumentChunk {
    fn from(record: DocumentChunk) -> Self {
        Self {
            document_id: record.document_id,
            index: record.chunk_index.max(0) as usize,
            content: record.content,
            start_char: record.start_char.max(0) as usize,
            end_char: record.end_char.max(0) as usize,
        }
    }
}

impl From<docket_core::DocumentChunk> for NewDocumentChunk {
    fn from(chunk: docket_core::DocumentChunk) -> Self {
        Self {
            document_id: chunk.document_id,
            chunk_index: chunk.index as i32,
            content: chunk.content,
            start_char: chunk.start_char as i32,
            end_char: chunk.end_char as i32,
        }
    }
}
