#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod storage;

pub use config::{ObjectStorageConfig, S3Config};
pub use error::{StorageError, StorageResult};
pub use storage::ObjectStorage;

/// Tracing target for object storage operations.
pub const TRACING_TARGET: &str = "docket_object";
