//! Core data model shared between the pipelines and the stores.

mod chunk;
mod document;

pub use chunk::DocumentChunk;
pub use document::{CASE_NAME_KEY, Document, normalize_labels};
