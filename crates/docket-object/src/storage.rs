//! Blob storage facade over OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::{ObjectStorageConfig, S3Config};
use crate::error::StorageResult;

/// Blob store for original uploads.
///
/// Uploads are written before any processing so a durable URL exists even
/// if later ingestion stages fail; a failed ingestion can therefore leave
/// an orphaned blob behind, which is accepted and logged.
#[derive(Clone)]
pub struct ObjectStorage {
    operator: Operator,
    backend_name: &'static str,
    public_base: String,
}

impl ObjectStorage {
    /// Creates a storage gateway from configuration.
    pub fn from_config(config: &ObjectStorageConfig) -> StorageResult<Self> {
        let (operator, public_base) = match config {
            ObjectStorageConfig::S3(s3) => build_s3(s3)?,
            ObjectStorageConfig::Memory => {
                let operator = Operator::new(services::Memory::default())?.finish();
                (operator, "memory://uploads".to_string())
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            "Object storage initialized"
        );

        Ok(Self {
            operator,
            backend_name: config.backend_name(),
            public_base,
        })
    }

    /// Creates an in-memory storage gateway.
    pub fn memory() -> StorageResult<Self> {
        Self::from_config(&ObjectStorageConfig::Memory)
    }

    /// Writes a blob and returns its durable URL.
    pub async fn put(&self, path: &str, bytes: Bytes) -> StorageResult<String> {
        let size = bytes.len();
        self.operator.write(path, bytes).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = %size,
            "Stored blob"
        );

        Ok(format!("{}/{}", self.public_base, path))
    }

    /// Reads a blob back.
    pub async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        let buffer = self.operator.read(path).await?;
        Ok(buffer.to_vec())
    }
}

fn build_s3(config: &S3Config) -> StorageResult<(Operator, String)> {
    let mut builder = services::S3::default()
        .bucket(&config.bucket)
        .region(&config.region)
        .access_key_id(&config.access_key_id)
        .secret_access_key(&config.secret_access_key);

    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint(endpoint);
    }

    let operator = Operator::new(builder)?.finish();

    let public_base = config.public_url.clone().unwrap_or_else(|| {
        format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region)
    });

    Ok((operator, public_base.trim_end_matches('/').to_string()))
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("backend", &self.backend_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_returns_url_and_get_round_trips() {
        let storage = ObjectStorage::memory().unwrap();

        let url = storage
            .put("case-a/contract.txt", Bytes::from_static(b"30 days notice"))
            .await
            .unwrap();
        assert_eq!(url, "memory://uploads/case-a/contract.txt");

        let bytes = storage.get("case-a/contract.txt").await.unwrap();
        assert_eq!(bytes, b"30 days notice");
    }

    #[tokio::test]
    async fn put_overwrites_existing_path() {
        let storage = ObjectStorage::memory().unwrap();

        storage
            .put("case-a/contract.txt", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        storage
            .put("case-a/contract.txt", Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert_eq!(storage.get("case-a/contract.txt").await.unwrap(), b"v2");
    }
}
