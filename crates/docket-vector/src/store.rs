//! Vector store trait and facade.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::config::VectorStoreConfig;
use crate::error::VectorResult;
use crate::memory::MemoryBackend;
use crate::pinecone::PineconeBackend;

/// Maximum records per upsert request, respecting store payload limits.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// Similarity metric configured on the index.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine similarity, scores in roughly `[-1, 1]`, higher is closer.
    #[default]
    Cosine,
    /// Euclidean distance.
    Euclidean,
    /// Dot product.
    DotProduct,
}

/// Vector record to be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorData {
    /// Unique identifier for the vector; upserting the same id overwrites.
    pub id: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// Metadata payload stored alongside the vector.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorData {
    /// Creates a new vector record with an id and embedding.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: HashMap::new(),
        }
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Match returned from a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Vector record id.
    pub id: String,
    /// Similarity score as reported by the configured metric.
    pub score: f32,
    /// Metadata payload (if requested).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SearchResult {
    /// Returns a string metadata field, if present.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Query options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Include metadata payloads in results.
    pub include_metadata: bool,
}

impl SearchOptions {
    /// Creates default query options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include metadata payloads in results.
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }
}

/// Trait for vector index backends.
///
/// Namespaces partition the index: writes and queries are scoped to
/// exactly one namespace, and a namespace that has received no writes
/// yields an empty match list, not an error.
#[async_trait]
pub trait VectorStoreBackend: Send + Sync {
    /// Ensures the configured index exists and is ready.
    ///
    /// Idempotent: creates the index with the given dimensionality and
    /// metric when absent, then waits (bounded) for it to become ready.
    async fn ensure_index(&self, dimension: usize, metric: DistanceMetric) -> VectorResult<()>;

    /// Upserts vector records into a namespace.
    async fn upsert(&self, namespace: &str, records: Vec<VectorData>) -> VectorResult<()>;

    /// Returns up to `top_k` nearest records in a namespace.
    async fn query(
        &self,
        namespace: &str,
        vector: Vec<f32>,
        top_k: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>>;
}

/// Unified vector store that wraps backend implementations.
///
/// Adds tracing and upsert batching on top of the backend trait.
pub struct VectorStore {
    backend_name: &'static str,
    backend: Box<dyn VectorStoreBackend>,
}

impl VectorStore {
    /// Creates a new vector store from configuration.
    pub async fn new(config: VectorStoreConfig) -> VectorResult<Self> {
        let backend: Box<dyn VectorStoreBackend> = match &config {
            VectorStoreConfig::Pinecone(cfg) => Box::new(PineconeBackend::new(cfg).await?),
            VectorStoreConfig::Memory => Box::new(MemoryBackend::new()),
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            "Vector store initialized"
        );

        Ok(Self {
            backend_name: config.backend_name(),
            backend,
        })
    }

    /// Creates an in-memory vector store.
    pub fn memory() -> Self {
        Self {
            backend_name: "memory",
            backend: Box::new(MemoryBackend::new()),
        }
    }

    /// Ensures the index exists and is ready.
    pub async fn ensure_index(
        &self,
        dimension: usize,
        metric: DistanceMetric,
    ) -> VectorResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            dimension = %dimension,
            "Ensuring index"
        );
        self.backend.ensure_index(dimension, metric).await
    }

    /// Upserts vector records into a namespace, batched to respect
    /// payload limits. Safe to call repeatedly: records are keyed by id.
    pub async fn upsert(&self, namespace: &str, records: Vec<VectorData>) -> VectorResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            namespace = %namespace,
            count = %records.len(),
            "Upserting vectors"
        );

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            self.backend.upsert(namespace, batch.to_vec()).await?;
        }

        Ok(())
    }

    /// Returns up to `top_k` nearest records in a namespace.
    pub async fn query(
        &self,
        namespace: &str,
        vector: Vec<f32>,
        top_k: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        tracing::debug!(
            target: TRACING_TARGET,
            namespace = %namespace,
            top_k = %top_k,
            "Querying vectors"
        );
        self.backend.query(namespace, vector, top_k, options).await
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("backend", &self.backend_name)
            .finish()
    }
}
