//! Repository for document and chunk database operations.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{Document, DocumentChunk, NewDocument, NewDocumentChunk};
use crate::{PgError, PgResult, schema};

/// Repository for document database operations.
///
/// Reads and mutations acting on behalf of a caller are filtered by the
/// owning account id, so a document owned by another account behaves like
/// a missing one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentRepository;

impl DocumentRepository {
    /// Inserts a new document record.
    pub async fn create_document(
        conn: &mut AsyncPgConnection,
        new_document: NewDocument,
    ) -> PgResult<Document> {
        use schema::documents;

        let document = diesel::insert_into(documents::table)
            .values(&new_document)
            .returning(Document::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)?;

        Ok(document)
    }

    /// Inserts chunk records for a document.
    pub async fn create_document_chunks(
        conn: &mut AsyncPgConnection,
        new_chunks: Vec<NewDocumentChunk>,
    ) -> PgResult<usize> {
        use schema::document_chunks;

        let inserted = diesel::insert_into(document_chunks::table)
            .values(&new_chunks)
            .execute(conn)
            .await
            .map_err(PgError::from)?;

        Ok(inserted)
    }

    /// Finds a document by its unique identifier.
    pub async fn find_document_by_id(
        conn: &mut AsyncPgConnection,
        document_id: Uuid,
    ) -> PgResult<Option<Document>> {
        use schema::documents::{self, dsl};

        let document = documents::table
            .filter(dsl::id.eq(document_id))
            .select(Document::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(document)
    }

    /// Finds a document owned by the given account.
    pub async fn find_owned_document(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
        document_id: Uuid,
    ) -> PgResult<Option<Document>> {
        use schema::documents::{self, dsl};

        let document = documents::table
            .filter(dsl::id.eq(document_id))
            .filter(dsl::account_id.eq(account_id))
            .select(Document::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(document)
    }

    /// Finds the subset of `document_ids` owned by the given account.
    pub async fn find_owned_documents(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
        document_ids: &[Uuid],
    ) -> PgResult<Vec<Document>> {
        use schema::documents::{self, dsl};

        let documents = documents::table
            .filter(dsl::id.eq_any(document_ids))
            .filter(dsl::account_id.eq(account_id))
            .select(Document::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok(documents)
    }

    /// Replaces the label set of an owned document.
    ///
    /// Returns `None` without mutating anything when the document does not
    /// exist or is owned by another account.
    pub async fn update_document_labels(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
        document_id: Uuid,
        labels: Vec<Option<String>>,
    ) -> PgResult<Option<Document>> {
        use schema::documents::dsl;

        let document = diesel::update(
            dsl::documents
                .filter(dsl::id.eq(document_id))
                .filter(dsl::account_id.eq(account_id)),
        )
        .set((dsl::labels.eq(labels), dsl::updated_at.eq(diesel::dsl::now)))
        .returning(Document::as_returning())
        .get_result(conn)
        .await
        .optional()
        .map_err(PgError::from)?;

        Ok(document)
    }

    /// Loads the label arrays of every document the account owns.
    pub async fn find_account_labels(
        conn: &mut AsyncPgConnection,
        account_id: Uuid,
    ) -> PgResult<Vec<Vec<Option<String>>>> {
        use schema::documents::{self, dsl};

        let labels = documents::table
            .filter(dsl::account_id.eq(account_id))
            .select(dsl::labels)
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok(labels)
    }

    /// Returns a document's chunk records in index order.
    pub async fn find_document_chunks(
        conn: &mut AsyncPgConnection,
        document_id: Uuid,
    ) -> PgResult<Vec<DocumentChunk>> {
        use schema::document_chunks::{self, dsl};

        let chunks = document_chunks::table
            .filter(dsl::document_id.eq(document_id))
            .order(dsl::chunk_index.asc())
            .select(DocumentChunk::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok(chunks)
    }
}
