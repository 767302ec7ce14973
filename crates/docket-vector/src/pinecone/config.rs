//! Pinecone configuration types.

use serde::{Deserialize, Serialize};

/// Pinecone backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// Pinecone API key.
    pub api_key: String,
    /// Index name.
    pub index: String,
    /// Serverless cloud provider (`aws`, `gcp` or `azure`).
    #[serde(default = "default_cloud")]
    pub cloud: String,
    /// Serverless region.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl PineconeConfig {
    /// Creates a new configuration with default cloud and region.
    pub fn new(api_key: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            index: index.into(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}
