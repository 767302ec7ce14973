//! Batched embedding generation with per-item fallback.
//!
//! Chunk embedding degrades instead of failing: a failed batch falls back
//! to embedding its items individually, and an item that still fails is
//! substituted with a zero vector instead of aborting the whole ingestion.
//! Query embedding is the opposite: a single user query has no sensible
//! fallback, so failure is fatal to that request.

use docket_core::{Error, Result, SharedTextEmbedder};
use futures::future::join_all;

use crate::TRACING_TARGET;

/// Default number of texts per embedding request.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Batched embedding generator over a [`TextEmbedder`] implementation.
///
/// [`TextEmbedder`]: docket_core::TextEmbedder
#[derive(Clone)]
pub struct Embedder {
    provider: SharedTextEmbedder,
    batch_size: usize,
}

impl Embedder {
    /// Creates a new embedder with the given batch size.
    pub fn new(provider: SharedTextEmbedder, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
        }
    }

    /// Creates a new embedder with the default batch size.
    pub fn with_defaults(provider: SharedTextEmbedder) -> Self {
        Self::new(provider, DEFAULT_BATCH_SIZE)
    }

    /// Returns the embedding dimensionality.
    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Embeds chunk texts, one vector per input in input order.
    ///
    /// Batches run concurrently. Every output vector has the provider
    /// dimensionality; items whose embedding failed at both the batch and
    /// the individual level come back as zero vectors.
    pub async fn embed_chunks(&self, texts: &[String]) -> Vec<Vec<f32>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let batches = texts
            .chunks(self.batch_size)
            .map(|batch| self.embed_batch(batch.to_vec()));

        let embedded: Vec<Vec<Vec<f32>>> = join_all(batches).await;
        embedded.into_iter().flatten().collect()
    }

    /// Embeds a single query; failure is fatal to the request.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.provider.embed(text).await.map_err(|source| {
            Error::embedding("query embedding failed").with_source(source)
        })
    }

    /// Embeds one batch, falling back to sequential per-item embedding
    /// (and ultimately zero vectors) on failure.
    async fn embed_batch(&self, batch: Vec<String>) -> Vec<Vec<f32>> {
        let dimensions = self.provider.dimensions();

        match self.provider.embed_many(batch.clone()).await {
            Ok(vectors) if vectors.len() == batch.len() => return vectors,
            Ok(vectors) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    expected = %batch.len(),
                    actual = %vectors.len(),
                    "Batch embedding returned wrong count, retrying individually"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    batch_size = %batch.len(),
                    error = %error,
                    "Batch embedding failed, retrying individually"
                );
            }
        }

        let mut vectors = Vec::with_capacity(batch.len());
        for (position, text) in batch.iter().enumerate() {
            match self.provider.embed(text).await {
                Ok(vector) if vector.len() == dimensions => vectors.push(vector),
                Ok(vector) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        position = %position,
                        expected = %dimensions,
                        actual = %vector.len(),
                        "Embedding has wrong dimensionality, substituting zero vector"
                    );
                    vectors.push(vec![0.0; dimensions]);
                }
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        position = %position,
                        error = %error,
                        "Item embedding failed, substituting zero vector"
                    );
                    vectors.push(vec![0.0; dimensions]);
                }
            }
        }

        vectors
    }
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field("model", &self.provider.model_name())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use docket_core::TextEmbedder;
    use docket_core::mock::MockAiProvider;

    use super::*;

    #[tokio::test]
    async fn preserves_length_and_order() {
        let mock = Arc::new(MockAiProvider::default());
        let embedder = Embedder::new(mock.clone(), 2);

        let texts: Vec<String> = (0..5).map(|i| format!("chunk {i}")).collect();
        let vectors = embedder.embed_chunks(&texts).await;

        assert_eq!(vectors.len(), texts.len());
        for (text, vector) in texts.iter().zip(&vectors) {
            assert_eq!(vector, &mock.embed(text).await.unwrap());
        }
    }

    #[tokio::test]
    async fn failed_item_becomes_zero_vector_in_place() {
        let mock = Arc::new(MockAiProvider::default());
        mock.fail_embedding_of("chunk 2");
        let embedder = Embedder::new(mock.clone(), 2);

        let texts: Vec<String> = (0..5).map(|i| format!("chunk {i}")).collect();
        let vectors = embedder.embed_chunks(&texts).await;

        assert_eq!(vectors.len(), 5);
        assert_eq!(vectors[2], vec![0.0; mock.dimensions()]);

        // Neighbours are unaffected, including the batch partner that
        // shared the failing batch.
        for i in [0usize, 1, 3, 4] {
            assert_eq!(vectors[i], mock.embed(&texts[i]).await.unwrap());
        }
    }

    #[tokio::test]
    async fn all_vectors_have_fixed_dimensionality() {
        let mock = Arc::new(MockAiProvider::default());
        mock.fail_embedding_of("chunk 0");
        let embedder = Embedder::new(mock.clone(), 3);

        let texts: Vec<String> = (0..4).map(|i| format!("chunk {i}")).collect();
        let vectors = embedder.embed_chunks(&texts).await;

        for vector in &vectors {
            assert_eq!(vector.len(), mock.dimensions());
        }
    }

    #[tokio::test]
    async fn query_embedding_failure_is_fatal() {
        let mock = Arc::new(MockAiProvider::default());
        mock.fail_embedding_of("bad query");
        let embedder = Embedder::with_defaults(mock);

        let result = embedder.embed_query("bad query").await;
        let error = result.unwrap_err();

        assert_eq!(error.kind(), docket_core::ErrorKind::Embedding);
        assert!(error.message().contains("query embedding failed"));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let mock = Arc::new(MockAiProvider::default());
        let embedder = Embedder::with_defaults(mock);

        assert!(embedder.embed_chunks(&[]).await.is_empty());
    }
}
