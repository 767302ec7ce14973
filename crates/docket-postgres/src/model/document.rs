//! Document model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::documents;

/// Document record as stored in the database.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Account that owns this document.
    pub account_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Blob storage URL of the original file.
    pub storage_url: String,
    /// Vector-index namespace the chunks were written into.
    pub namespace: String,
    /// Number of chunks produced during ingestion.
    pub chunk_count: i32,
    /// Number of characters of extracted text.
    pub character_count: i32,
    /// User-assigned labels.
    pub labels: Vec<Option<String>>,
    /// Free-form user-supplied metadata.
    pub metadata: serde_json::Value,
    /// Timestamp when the document was created.
    pub created_at: Timestamp,
    /// Timestamp when the document was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new document.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocument {
    /// Document id, assigned by the ingestion pipeline.
    pub id: Uuid,
    /// Owning account id.
    pub account_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Blob storage URL.
    pub storage_url: String,
    /// Vector-index namespace.
    pub namespace: String,
    /// Chunk count.
    pub chunk_count: i32,
    /// Character count.
    pub character_count: i32,
    /// Labels.
    pub labels: Vec<Option<String>>,
    /// Metadata.
    pub metadata: serde_json::Value,
}

impl Document {
    /// Returns the flattened labels (removing None values).
    pub fn labels(&self) -> Vec<String> {
        self.labels.iter().flatten().cloned().collect()
    }
}

impl From<Document> for docket_core::Document {
    fn from(record: Document) -> Self {
        let labels = record.labels();

        Self {
            id: record.id,
            account_id: record.account_id,
            file_name: record.file_name,
            content_type: record.content_type,
            storage_url: record.storage_url,
            namespace: record.namespace,
            chunk_count: record.chunk_count.max(0) as usize,
            character_count: record.character_count.max(0) as usize,
            labels,
            metadata: record.metadata,
            created_at: record.created_at.into(),
        }
    }
}

impl From<docket_core::Document> for NewDocument {
    fn from(document: docket_core::Document) -> Self {
        Self {
            id: document.id,
            account_id: document.account_id,
            file_name: document.file_name,
            content_type: document.content_type,
            storage_url: document.storage_url,
            namespace: document.namespace,
            chunk_count: document.chunk_count as i32,
            character_count: document.character_count as i32,
            labels: document.labels.into_iter().map(Some).collect(),
            metadata: document.metadata,
        }
    }
}
