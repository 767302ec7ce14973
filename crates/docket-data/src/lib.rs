#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod memory;
mod store;

pub use error::{DataError, DataResult};
pub use memory::MemoryDocumentStore;
pub use store::{DocumentStore, SharedDocumentStore};

/// Tracing target for metadata store operations.
pub const TRACING_TARGET: &str = "docket_data";
