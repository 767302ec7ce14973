//! Multi-provider management for AI inference.

mod completion;
mod embedding;

pub use completion::CompletionProvider;
pub use embedding::{DEFAULT_EMBEDDING_DIMENSIONS, EmbeddingProvider};
