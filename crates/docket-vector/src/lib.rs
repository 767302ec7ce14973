#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod memory;
pub mod pinecone;

mod config;
mod error;
mod store;

pub use config::VectorStoreConfig;
pub use error::{VectorError, VectorResult};
pub use pinecone::PineconeConfig;
pub use store::{
    DistanceMetric, SearchOptions, SearchResult, VectorData, VectorStore, VectorStoreBackend,
};

/// Tracing target for vector store operations.
pub const TRACING_TARGET: &str = "docket_vector";
