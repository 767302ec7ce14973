//! Pinecone backend implementation.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use pinecone_sdk::models::{
    Cloud, DeletionProtection, Kind, Metadata, Metric, Namespace, Value as PineconeValue, Vector,
    WaitPolicy,
};
use pinecone_sdk::pinecone::data::Index;
use pinecone_sdk::pinecone::{PineconeClient, PineconeClientConfig};
use tokio::sync::Mutex;

use super::PineconeConfig;
use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::store::{
    DistanceMetric, SearchOptions, SearchResult, VectorData, VectorStoreBackend,
};

/// Bounded readiness poll: attempts x interval caps the wait at 5 minutes.
const INDEX_READY_ATTEMPTS: u32 = 30;
const INDEX_READY_INTERVAL: Duration = Duration::from_secs(10);

/// Pinecone backend implementation.
///
/// The control plane (index provisioning) talks through the client; the
/// data plane handle is resolved lazily from the index host on first use.
pub struct PineconeBackend {
    client: PineconeClient,
    index: Mutex<Option<Index>>,
    config: PineconeConfig,
}

impl PineconeBackend {
    /// Creates a new Pinecone backend.
    pub async fn new(config: &PineconeConfig) -> VectorResult<Self> {
        let client_config = PineconeClientConfig {
            api_key: Some(config.api_key.clone()),
            ..Default::default()
        };

        let client = client_config
            .client()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            index = %config.index,
            "Pinecone backend initialized"
        );

        Ok(Self {
            client,
            index: Mutex::new(None),
            config: config.clone(),
        })
    }

    fn cloud(&self) -> Cloud {
        match self.config.cloud.to_ascii_lowercase().as_str() {
            "gcp" => Cloud::Gcp,
            "azure" => Cloud::Azure,
            _ => Cloud::Aws,
        }
    }

    /// Resolves the data-plane handle from the index host.
    async fn connect_data_plane(&self) -> VectorResult<Index> {
        let description = self
            .client
            .describe_index(&self.config.index)
            .await
            .map_err(|e| map_pinecone_error("describe index", &e.to_string()))?;

        self.client
            .index(&description.host)
            .await
            .map_err(|e| VectorError::connection(format!("failed to connect to index: {e}")))
    }
}

#[async_trait]
impl VectorStoreBackend for PineconeBackend {
    async fn ensure_index(&self, dimension: usize, metric: DistanceMetric) -> VectorResult<()> {
        let existing = self
            .client
            .list_indexes()
            .await
            .map_err(|e| map_pinecone_error("list indexes", &e.to_string()))?;

        let present = existing
            .indexes
            .unwrap_or_default()
            .iter()
            .any(|index| index.name == self.config.index);

        if !present {
            self.client
                .create_serverless_index(
                    &self.config.index,
                    dimension as i32,
                    metric_to_pinecone(metric),
                    self.cloud(),
                    &self.config.region,
                    DeletionProtection::Disabled,
                    WaitPolicy::NoWait,
                )
                .await
                .map_err(|e| map_pinecone_error("create index", &e.to_string()))?;

            tracing::info!(
                target: TRACING_TARGET,
                index = %self.config.index,
                dimension = %dimension,
                "Created Pinecone serverless index"
            );
        }

        for attempt in 1..=INDEX_READY_ATTEMPTS {
            let description = self
                .client
                .describe_index(&self.config.index)
                .await
                .map_err(|e| map_pinecone_error("describe index", &e.to_string()))?;

            if description.status.ready {
                return Ok(());
            }

            tracing::debug!(
                target: TRACING_TARGET,
                index = %self.config.index,
                attempt = %attempt,
                "Index not ready yet"
            );

            tokio::time::sleep(INDEX_READY_INTERVAL).await;
        }

        Err(VectorError::timeout(format!(
            "index {} did not become ready",
            self.config.index
        )))
    }

    async fn upsert(&self, namespace: &str, records: Vec<VectorData>) -> VectorResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let vectors: Vec<Vector> = records
            .into_iter()
            .map(|record| {
                let metadata = if record.metadata.is_empty() {
                    None
                } else {
                    Some(hashmap_to_metadata(record.metadata))
                };

                Vector {
                    id: record.id,
                    values: record.vector,
                    sparse_values: None,
                    metadata,
                }
            })
            .collect();

        let mut guard = self.index.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect_data_plane().await?);
        }
        let Some(index) = guard.as_mut() else {
            return Err(VectorError::backend("data plane handle unavailable"));
        };

        index
            .upsert(&vectors, &Namespace::from(namespace))
            .await
            .map_err(|e| map_pinecone_error("upsert", &e.to_string()))?;

        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: Vec<f32>,
        top_k: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        let mut guard = self.index.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect_data_plane().await?);
        }
        let Some(index) = guard.as_mut() else {
            return Err(VectorError::backend("data plane handle unavailable"));
        };

        let response = index
            .query_by_value(
                vector,
                None,
                top_k as u32,
                &Namespace::from(namespace),
                None,
                Some(false),
                Some(options.include_metadata),
            )
            .await
            .map_err(|e| map_pinecone_error("query", &e.to_string()))?;

        let results = response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.map(metadata_to_hashmap).unwrap_or_default();

                SearchResult {
                    id: m.id,
                    score: m.score,
                    metadata,
                }
            })
            .collect();

        Ok(results)
    }
}

/// Normalizes store errors: unknown index/namespace conditions become
/// [`VectorError::NotFound`], everything else a backend error.
fn map_pinecone_error(operation: &str, message: &str) -> VectorError {
    let lowered = message.to_ascii_lowercase();

    if lowered.contains("not found") || lowered.contains("404") {
        VectorError::not_found(format!("{operation}: {message}"))
    } else {
        VectorError::backend(format!("{operation}: {message}"))
    }
}

fn metric_to_pinecone(metric: DistanceMetric) -> Metric {
    match metric {
        DistanceMetric::Cosine => Metric::Cosine,
        DistanceMetric::Euclidean => Metric::Euclidean,
        DistanceMetric::DotProduct => Metric::Dotproduct,
    }
}

/// Converts Pinecone metadata to a JSON map.
fn metadata_to_hashmap(metadata: Metadata) -> HashMap<String, serde_json::Value> {
    metadata
        .fields
        .into_iter()
        .map(|(k, v)| (k, pinecone_value_to_json(v)))
        .collect()
}

/// Converts a JSON map to Pinecone metadata.
fn hashmap_to_metadata(map: HashMap<String, serde_json::Value>) -> Metadata {
    let fields: BTreeMap<String, PineconeValue> = map
        .into_iter()
        .map(|(k, v)| (k, json_to_pinecone_value(v)))
        .collect();

    Metadata { fields }
}

/// Converts a Pinecone value to a JSON value.
fn pinecone_value_to_json(value: PineconeValue) -> serde_json::Value {
    match value.kind {
        Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::NumberValue(n)) => serde_json::Value::Number(
            serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::StructValue(s)) => {
            let map: serde_json::Map<String, serde_json::Value> = s
                .fields
                .into_iter()
                .map(|(k, v)| (k, pinecone_value_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        Some(Kind::ListValue(list)) => {
            let arr: Vec<serde_json::Value> = list
                .values
                .into_iter()
                .map(pinecone_value_to_json)
                .collect();
            serde_json::Value::Array(arr)
        }
        None => serde_json::Value::Null,
    }
}

/// Converts a JSON value to a Pinecone value.
fn json_to_pinecone_value(value: serde_json::Value) -> PineconeValue {
    let kind = match value {
        serde_json::Value::Null => Some(Kind::NullValue(0)),
        serde_json::Value::Bool(b) => Some(Kind::BoolValue(b)),
        serde_json::Value::Number(n) => Some(Kind::NumberValue(n.as_f64().unwrap_or(0.0))),
        serde_json::Value::String(s) => Some(Kind::StringValue(s)),
        serde_json::Value::Array(arr) => Some(Kind::ListValue(prost_types::ListValue {
            values: arr.into_iter().map(json_to_pinecone_value).collect(),
        })),
        serde_json::Value::Object(obj) => {
            let fields: BTreeMap<String, PineconeValue> = obj
                .into_iter()
                .map(|(k, v)| (k, json_to_pinecone_value(v)))
                .collect();
            Some(Kind::StructValue(prost_types::Struct { fields }))
        }
    };

    PineconeValue { kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_conditions_are_normalized() {
        let err = map_pinecone_error("query", "namespace Not Found (404)");
        assert!(matches!(err, VectorError::NotFound(_)));

        let err = map_pinecone_error("upsert", "internal server error");
        assert!(matches!(err, VectorError::Backend(_)));
    }

    #[test]
    fn json_metadata_round_trips() {
        let mut map = HashMap::new();
        map.insert("content".to_string(), serde_json::json!("30 days notice"));
        map.insert("chunk_index".to_string(), serde_json::json!(2.0));
        map.insert("labels".to_string(), serde_json::json!(["a", "b"]));

        let round_tripped = metadata_to_hashmap(hashmap_to_metadata(map.clone()));
        assert_eq!(round_tripped, map);
    }
}
