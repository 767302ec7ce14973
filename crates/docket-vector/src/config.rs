//! Vector store configuration types.

use serde::{Deserialize, Serialize};

pub use crate::pinecone::PineconeConfig;

/// Vector store backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VectorStoreConfig {
    /// Pinecone managed serverless index.
    Pinecone(PineconeConfig),
    /// In-memory index for tests and local development.
    Memory,
}

impl VectorStoreConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Pinecone(_) => "pinecone",
            Self::Memory => "memory",
        }
    }
}
