//! In-memory cosine-similarity backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::store::{
    DistanceMetric, SearchOptions, SearchResult, VectorData, VectorStoreBackend,
};

#[derive(Default)]
struct MemoryState {
    dimension: Option<usize>,
    namespaces: HashMap<String, HashMap<String, VectorData>>,
}

/// In-memory [`VectorStoreBackend`] with cosine scoring.
///
/// Mirrors the external store's namespace semantics: a namespace without
/// writes yields an empty match list, while querying before the index was
/// ever created yields a not-found error.
#[derive(Default, Clone)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records stored in a namespace.
    pub async fn namespace_len(&self, namespace: &str) -> usize {
        let state = self.state.read().await;
        state
            .namespaces
            .get(namespace)
            .map(HashMap::len)
            .unwrap_or_default()
    }
}

#[async_trait]
impl VectorStoreBackend for MemoryBackend {
    async fn ensure_index(&self, dimension: usize, _metric: DistanceMetric) -> VectorResult<()> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.dimension {
            if existing != dimension {
                return Err(VectorError::dimension_mismatch(existing, dimension));
            }
        } else {
            state.dimension = Some(dimension);
            tracing::debug!(
                target: TRACING_TARGET,
                dimension = %dimension,
                "Created in-memory index"
            );
        }

        Ok(())
    }

    async fn upsert(&self, namespace: &str, records: Vec<VectorData>) -> VectorResult<()> {
        let mut state = self.state.write().await;

        if state.dimension.is_none() {
            return Err(VectorError::not_found("index does not exist"));
        }

        let space = state.namespaces.entry(namespace.to_owned()).or_default();
        for record in records {
            space.insert(record.id.clone(), record);
        }

        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: Vec<f32>,
        top_k: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        let state = self.state.read().await;

        if state.dimension.is_none() {
            return Err(VectorError::not_found("index does not exist"));
        }

        // A namespace that has received no writes is empty, not an error.
        let Some(space) = state.namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<SearchResult> = space
            .values()
            .map(|record| SearchResult {
                id: record.id.clone(),
                score: cosine_similarity(&vector, &record.vector),
                metadata: if options.include_metadata {
                    record.metadata.clone()
                } else {
                    HashMap::new()
                },
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);

        Ok(results)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> VectorData {
        VectorData::new(id, vector).with_field("id", serde_json::json!(id))
    }

    #[tokio::test]
    async fn query_before_index_creation_is_not_found() {
        let backend = MemoryBackend::new();

        let result = backend
            .query("case-a", vec![1.0, 0.0], 5, SearchOptions::new())
            .await;

        assert!(matches!(result, Err(VectorError::NotFound(_))));
    }

    #[tokio::test]
    async fn unwritten_namespace_yields_empty_matches() {
        let backend = MemoryBackend::new();
        backend.ensure_index(2, DistanceMetric::Cosine).await.unwrap();

        backend
            .upsert("case-a", vec![record("a-0", vec![1.0, 0.0])])
            .await
            .unwrap();

        let matches = backend
            .query("case-b", vec![1.0, 0.0], 5, SearchOptions::new())
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn ranks_by_cosine_similarity() {
        let backend = MemoryBackend::new();
        backend.ensure_index(2, DistanceMetric::Cosine).await.unwrap();

        backend
            .upsert(
                "case-a",
                vec![
                    record("aligned", vec![1.0, 0.0]),
                    record("orthogonal", vec![0.0, 1.0]),
                    record("opposite", vec![-1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let matches = backend
            .query(
                "case-a",
                vec![1.0, 0.0],
                2,
                SearchOptions::new().with_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "aligned");
        assert!(matches[0].score > matches[1].score);
        assert_eq!(matches[0].metadata_str("id"), Some("aligned"));
    }

    #[tokio::test]
    async fn upsert_overwrites_by_id() {
        let backend = MemoryBackend::new();
        backend.ensure_index(2, DistanceMetric::Cosine).await.unwrap();

        backend
            .upsert("case-a", vec![record("a-0", vec![1.0, 0.0])])
            .await
            .unwrap();
        backend
            .upsert("case-a", vec![record("a-0", vec![0.0, 1.0])])
            .await
            .unwrap();

        assert_eq!(backend.namespace_len("case-a").await, 1);
    }

    #[tokio::test]
    async fn ensure_index_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.ensure_index(4, DistanceMetric::Cosine).await.unwrap();
        backend.ensure_index(4, DistanceMetric::Cosine).await.unwrap();

        let mismatch = backend.ensure_index(8, DistanceMetric::Cosine).await;
        assert!(matches!(mismatch, Err(VectorError::DimensionMismatch { .. })));
    }
}
