//! Database models.

mod document;
mod document_chunk;

pub use document::{Document, NewDocument};
pub use document_chunk::{DocumentChunk, NewDocumentChunk};
