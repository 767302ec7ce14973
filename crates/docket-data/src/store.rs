//! Document metadata store trait.

use std::sync::Arc;

use docket_core::{Document, DocumentChunk};
use uuid::Uuid;

use crate::error::DataResult;

/// Type alias for a shared, backend-agnostic document store.
pub type SharedDocumentStore = Arc<dyn DocumentStore>;

/// Persistent store for document and chunk records.
///
/// Every read or mutation that acts on behalf of a caller is scoped by the
/// owning account id; a document another account owns behaves exactly like
/// a missing one.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document together with its chunk records.
    ///
    /// Called only after the chunk vectors are durably stored; ingestion
    /// is not considered complete until this succeeds.
    async fn insert_document(
        &self,
        document: Document,
        chunks: Vec<DocumentChunk>,
    ) -> DataResult<()>;

    /// Looks up a document by id regardless of ownership.
    async fn find_document(&self, document_id: Uuid) -> DataResult<Option<Document>>;

    /// Looks up a document the account owns.
    async fn find_owned_document(
        &self,
        account_id: Uuid,
        document_id: Uuid,
    ) -> DataResult<Option<Document>>;

    /// Looks up the subset of `document_ids` the account owns.
    async fn find_owned_documents(
        &self,
        account_id: Uuid,
        document_ids: &[Uuid],
    ) -> DataResult<Vec<Document>>;

    /// Replaces the label set of an owned document.
    ///
    /// Returns the updated record; a document that does not exist or is
    /// not owned by the account yields [`DataError::NotFound`] and
    /// mutates nothing.
    ///
    /// [`DataError::NotFound`]: crate::DataError::NotFound
    async fn replace_labels(
        &self,
        account_id: Uuid,
        document_id: Uuid,
        labels: Vec<String>,
    ) -> DataResult<Document>;

    /// Lists the distinct labels across all documents the account owns.
    async fn list_labels(&self, account_id: Uuid) -> DataResult<Vec<String>>;

    /// Returns the chunk records of a document in index order.
    async fn find_chunks(&self, document_id: Uuid) -> DataResult<Vec<DocumentChunk>>;
}
