//! In-memory document store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use docket_core::{Document, DocumentChunk, normalize_labels};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::error::{DataError, DataResult};
use crate::store::DocumentStore;

#[derive(Default)]
struct Records {
    documents: HashMap<Uuid, Document>,
    chunks: HashMap<Uuid, Vec<DocumentChunk>>,
}

/// In-memory [`DocumentStore`] backend.
///
/// State is process-local and lost on restart; production deployments use
/// the PostgreSQL backend instead.
#[derive(Default, Clone)]
pub struct MemoryDocumentStore {
    records: Arc<RwLock<Records>>,
}

impl MemoryDocumentStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.records.read().await.documents.len()
    }

    /// Returns whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_document(
        &self,
        document: Document,
        chunks: Vec<DocumentChunk>,
    ) -> DataResult<()> {
        let mut records = self.records.write().await;

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document.id,
            chunk_count = %chunks.len(),
            "Inserting document"
        );

        records.chunks.insert(document.id, chunks);
        records.documents.insert(document.id, document);
        Ok(())
    }

    async fn find_document(&self, document_id: Uuid) -> DataResult<Option<Document>> {
        let records = self.records.read().await;
        Ok(records.documents.get(&document_id).cloned())
    }

    async fn find_owned_document(
        &self,
        account_id: Uuid,
        document_id: Uuid,
    ) -> DataResult<Option<Document>> {
        let records = self.records.read().await;

        Ok(records
            .documents
            .get(&document_id)
            .filter(|document| document.account_id == account_id)
            .cloned())
    }

    async fn find_owned_documents(
        &self,
        account_id: Uuid,
        document_ids: &[Uuid],
    ) -> DataResult<Vec<Document>> {
        let records = self.records.read().await;

        Ok(document_ids
            .iter()
            .filter_map(|id| records.documents.get(id))
            .filter(|document| document.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn replace_labels(
        &self,
        account_id: Uuid,
        document_id: Uuid,
        labels: Vec<String>,
    ) -> DataResult<Document> {
        let mut records = self.records.write().await;

        let document = records
            .documents
            .get_mut(&document_id)
            .filter(|document| document.account_id == account_id)
            .ok_or_else(|| DataError::not_found(document_id.to_string()))?;

        document.labels = normalize_labels(labels);
        Ok(document.clone())
    }

    async fn list_labels(&self, account_id: Uuid) -> DataResult<Vec<String>> {
        let records = self.records.read().await;

        let labels = records
            .documents
            .values()
            .filter(|document| document.account_id == account_id)
            .flat_map(|document| document.labels.iter().cloned());

        Ok(normalize_labels(labels))
    }

    async fn find_chunks(&self, document_id: Uuid) -> DataResult<Vec<DocumentChunk>> {
        let records = self.records.read().await;
        Ok(records.chunks.get(&document_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn document(account_id: Uuid, labels: &[&str]) -> Document {
        Document {
            id: Uuid::new_v4(),
            account_id,
            file_name: "contract.txt".to_string(),
            content_type: "text/plain".to_string(),
            storage_url: "memory://uploads/contract.txt".to_string(),
            namespace: "default-case".to_string(),
            chunk_count: 1,
            character_count: 120,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            metadata: serde_json::json!({}),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn ownership_scopes_lookups() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let doc = document(owner, &[]);
        let id = doc.id;

        store.insert_document(doc, vec![]).await.unwrap();

        assert!(store.find_owned_document(owner, id).await.unwrap().is_some());
        assert!(store.find_owned_document(stranger, id).await.unwrap().is_none());
        assert_eq!(store.find_owned_documents(owner, &[id]).await.unwrap().len(), 1);
        assert!(store.find_owned_documents(stranger, &[id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_labels_requires_ownership() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let doc = document(owner, &["x", "y"]);
        let id = doc.id;

        store.insert_document(doc, vec![]).await.unwrap();

        let updated = store
            .replace_labels(owner, id, vec!["z".to_string()])
            .await
            .unwrap();
        assert_eq!(updated.labels, vec!["z".to_string()]);

        let denied = store
            .replace_labels(Uuid::new_v4(), id, vec!["w".to_string()])
            .await;
        assert!(matches!(denied, Err(DataError::NotFound(_))));

        // The denied mutation left the labels untouched.
        let current = store.find_document(id).await.unwrap().unwrap();
        assert_eq!(current.labels, vec!["z".to_string()]);
    }

    #[tokio::test]
    async fn distinct_labels_across_owned_documents() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();

        store
            .insert_document(document(owner, &["privileged", "exhibit"]), vec![])
            .await
            .unwrap();
        store
            .insert_document(document(owner, &["exhibit", "draft"]), vec![])
            .await
            .unwrap();
        store
            .insert_document(document(Uuid::new_v4(), &["unrelated"]), vec![])
            .await
            .unwrap();

        let labels = store.list_labels(owner).await.unwrap();
        assert_eq!(
            labels,
            vec!["draft".to_string(), "exhibit".to_string(), "privileged".to_string()]
        );
    }
}
