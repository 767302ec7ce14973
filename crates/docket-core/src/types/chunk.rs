//! Chunk of a document's extracted text.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous slice of a document's extracted text.
///
/// Chunks are produced by a single deterministic pass over the text and are
/// immutable afterwards; re-ingesting a file produces new chunks under a
/// new document id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    /// Parent document identifier.
    pub document_id: Uuid,
    /// Zero-based sequence index within the document.
    pub index: usize,
    /// Chunk text content; never empty.
    pub content: String,
    /// Starting character offset in the extracted text.
    pub start_char: usize,
    /// Ending character offset, `start_char + content character count`.
    pub end_char: usize,
}

impl DocumentChunk {
    /// Creates a new chunk, deriving the end offset from the content.
    pub fn new(document_id: Uuid, index: usize, content: String, start_char: usize) -> Self {
        let end_char = start_char + content.chars().count();

        Self {
            document_id,
            index,
            content,
            start_char,
            end_char,
        }
    }

    /// Deterministic vector-record id: document id plus chunk index.
    ///
    /// Re-upserting the same chunk overwrites its record instead of
    /// duplicating it.
    pub fn vector_id(&self) -> String {
        format!("{}-{}", self.document_id, self.index)
    }

    /// Returns the chunk length in characters.
    pub fn char_len(&self) -> usize {
        self.end_char - self.start_char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_offset_is_derived_from_content() {
        let id = Uuid::new_v4();
        let chunk = DocumentChunk::new(id, 0, "héllo".to_string(), 10);

        assert_eq!(chunk.end_char, 15);
        assert_eq!(chunk.char_len(), 5);
    }

    #[test]
    fn vector_id_is_deterministic() {
        let id = Uuid::new_v4();
        let a = DocumentChunk::new(id, 2, "text".to_string(), 0);
        let b = DocumentChunk::new(id, 2, "text".to_string(), 0);

        assert_eq!(a.vector_id(), b.vector_id());
        assert_eq!(a.vector_id(), format!("{id}-2"));
    }
}
