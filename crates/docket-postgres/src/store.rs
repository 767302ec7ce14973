//! [`DocumentStore`] implementation backed by PostgreSQL.

use docket_core::{Document, DocumentChunk, normalize_labels};
use docket_data::{DataError, DataResult, DocumentStore};
use uuid::Uuid;

use crate::client::PgClient;
use crate::model::{NewDocument, NewDocumentChunk};
use crate::query::DocumentRepository;

/// PostgreSQL-backed document store.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    client: PgClient,
}

impl PgDocumentStore {
    /// Creates a store over an existing client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_document(
        &self,
        document: Document,
        chunks: Vec<DocumentChunk>,
    ) -> DataResult<()> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        DocumentRepository::create_document(&mut conn, NewDocument::from(document))
            .await
            .map_err(DataError::from)?;

        if !chunks.is_empty() {
            let new_chunks = chunks.into_iter().map(NewDocumentChunk::from).collect();
            DocumentRepository::create_document_chunks(&mut conn, new_chunks)
                .await
                .map_err(DataError::from)?;
        }

        Ok(())
    }

    async fn find_document(&self, document_id: Uuid) -> DataResult<Option<Document>> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let document = DocumentRepository::find_document_by_id(&mut conn, document_id)
            .await
            .map_err(DataError::from)?;

        Ok(document.map(Into::into))
    }

    async fn find_owned_document(
        &self,
        account_id: Uuid,
        document_id: Uuid,
    ) -> DataResult<Option<Document>> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let document =
            DocumentRepository::find_owned_document(&mut conn, account_id, document_id)
                .await
                .map_err(DataError::from)?;

        Ok(document.map(Into::into))
    }

    async fn find_owned_documents(
        &self,
        account_id: Uuid,
        document_ids: &[Uuid],
    ) -> DataResult<Vec<Document>> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let documents =
            DocumentRepository::find_owned_documents(&mut conn, account_id, document_ids)
                .await
                .map_err(DataError::from)?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn replace_labels(
        &self,
        account_id: Uuid,
        document_id: Uuid,
        labels: Vec<String>,
    ) -> DataResult<Document> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let labels = normalize_labels(labels).into_iter().map(Some).collect();
        let document =
            DocumentRepository::update_document_labels(&mut conn, account_id, document_id, labels)
                .await
                .map_err(DataError::from)?;

        document
            .map(Into::into)
            .ok_or_else(|| DataError::not_found(document_id.to_string()))
    }

    async fn list_labels(&self, account_id: Uuid) -> DataResult<Vec<String>> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let label_sets = DocumentRepository::find_account_labels(&mut conn, account_id)
            .await
            .map_err(DataError::from)?;

        Ok(normalize_labels(
            label_sets.into_iter().flatten().flatten(),
        ))
    }

    async fn find_chunks(&self, document_id: Uuid) -> DataResult<Vec<DocumentChunk>> {
        let mut conn = self.client.get_connection().await.map_err(DataError::from)?;

        let chunks = DocumentRepository::find_document_chunks(&mut conn, document_id)
            .await
            .map_err(DataError::from)?;

        Ok(chunks.into_iter().map(Into::into).collect())
    }
}
