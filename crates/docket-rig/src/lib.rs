#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod answerer;
mod embedder;
mod error;

pub mod provider;

pub use answerer::AnswerAgent;
pub use embedder::{DEFAULT_BATCH_SIZE, Embedder};
pub use error::{Error, Result};
pub use provider::{CompletionProvider, EmbeddingProvider};

/// Tracing target for provider operations.
pub const TRACING_TARGET: &str = "docket_rig";
