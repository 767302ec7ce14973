//! Overlap-aware text splitting for chunk creation.
//!
//! The chunker walks the extracted text in fixed-size character windows,
//! snapping window ends to nearby sentence or paragraph boundaries so that
//! chunks do not cut through the middle of a clause. Consecutive chunks
//! overlap by a fixed number of characters to preserve retrieval context
//! across boundaries.

use uuid::Uuid;

use crate::types::DocumentChunk;

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Characters scanned on each side of a naive window end when searching
/// for a sentence terminator or paragraph break.
const BOUNDARY_LOOKAROUND: usize = 50;

/// Text splitter producing overlapping, boundary-aware document chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Creates a new chunker.
    ///
    /// `chunk_size` must be strictly greater than `overlap`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(
            chunk_size > overlap,
            "chunk size must be greater than overlap"
        );

        Self {
            chunk_size,
            overlap,
        }
    }

    /// Splits `text` into ordered chunks for the given document.
    ///
    /// Offsets are character-based. Chunks are emitted in increasing
    /// `start_char` order with contiguous indices starting at 0; every
    /// non-final chunk overlaps its successor by up to the configured
    /// overlap (less when a boundary snap shortened the window). A text
    /// shorter than the window yields exactly one chunk; a whitespace-only
    /// tail terminates the walk without emitting an empty chunk.
    pub fn chunk(&self, text: &str, document_id: Uuid) -> Vec<DocumentChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total {
            let naive_end = (start + self.chunk_size).min(total);
            let end = if naive_end < total {
                snap_to_boundary(&chars, start, naive_end)
            } else {
                naive_end
            };

            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();

            if trimmed.is_empty() {
                break;
            }

            let leading_whitespace = window.chars().take_while(|c| c.is_whitespace()).count();
            chunks.push(DocumentChunk::new(
                document_id,
                chunks.len(),
                trimmed.to_owned(),
                start + leading_whitespace,
            ));

            if end >= total {
                break;
            }

            // Clamp the next start to strictly exceed the previous one so
            // the walk terminates for any chunk size/overlap combination.
            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { start + 1 };
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

/// Snaps a window end to just after the last sentence terminator (`. `,
/// `! `, `? `) or paragraph break (`\n\n`) within the lookaround region;
/// keeps the naive cut when no boundary is found.
fn snap_to_boundary(chars: &[char], start: usize, naive_end: usize) -> usize {
    let from = naive_end.saturating_sub(BOUNDARY_LOOKAROUND).max(start + 1);
    let to = (naive_end + BOUNDARY_LOOKAROUND).min(chars.len());

    let mut snapped = None;
    for i in from..to.saturating_sub(1) {
        let boundary = matches!(
            (chars[i], chars[i + 1]),
            ('.', ' ') | ('!', ' ') | ('?', ' ') | ('\n', '\n')
        );
        if boundary {
            snapped = Some(i + 2);
        }
    }

    snapped.filter(|&end| end > start).unwrap_or(naive_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Vec<DocumentChunk> {
        Chunker::new(chunk_size, overlap).chunk(text, Uuid::new_v4())
    }

    #[test]
    fn short_text_yields_one_chunk() {
        let chunks = chunk("The termination clause requires 30 days notice.", 1000, 200);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start_char, 0);
        assert_eq!(
            chunks[0].content,
            "The termination clause requires 30 days notice."
        );
    }

    #[test]
    fn offsets_are_strictly_increasing_and_indices_contiguous() {
        let text = "word ".repeat(500);
        let chunks = chunk(&text, 100, 20);

        assert!(chunks.len() > 1);
        for (i, pair) in chunks.windows(2).enumerate() {
            assert!(pair[0].start_char < pair[1].start_char);
            assert_eq!(pair[0].index, i);
            assert_eq!(pair[1].index, i + 1);
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let text = "a".repeat(95) + ". " + &"b".repeat(200);
        let chunks = chunk(&text, 100, 20);

        assert!(chunks.len() >= 2);
        // The second window starts `overlap` characters before the first
        // window's end.
        let first_end = chunks[0].end_char;
        assert!(chunks[1].start_char <= first_end);
        assert!(first_end - chunks[1].start_char <= 20);
    }

    #[test]
    fn snaps_to_sentence_boundary() {
        // The sentence terminator sits inside the lookaround region of the
        // naive 100-char cut, so the first chunk ends right after it.
        let text = "x".repeat(88) + ". " + &"y".repeat(200);
        let chunks = chunk(&text, 100, 20);

        assert_eq!(chunks[0].content, "x".repeat(88) + ".");
    }

    #[test]
    fn snaps_to_paragraph_break() {
        let text = "p".repeat(90) + "\n\n" + &"q".repeat(200);
        let chunks = chunk(&text, 100, 20);

        assert_eq!(chunks[0].content, "p".repeat(90));
        // The next window starts `overlap` characters before the snapped
        // end (92), inside the first paragraph.
        assert_eq!(chunks[1].start_char, 72);
    }

    #[test]
    fn whitespace_tail_emits_no_empty_chunk() {
        let text = "z".repeat(100) + &" ".repeat(300);
        let chunks = chunk(&text, 100, 20);

        assert!(!chunks.is_empty());
        for c in &chunks {
            assert!(!c.content.is_empty());
        }
        assert!(chunks.last().unwrap().content.ends_with('z'));
    }

    #[test]
    fn chunk_count_is_bounded() {
        let text = "m".repeat(10_000);
        let chunk_size = 1000;
        let overlap = 200;
        let chunks = chunk(&text, chunk_size, overlap);

        let bound = 10_000usize.div_ceil(chunk_size - overlap) + 2;
        assert!(chunks.len() <= bound);
    }

    #[test]
    fn pathological_overlap_terminates() {
        let text = "n".repeat(50);
        let chunks = chunk(&text, 10, 9);

        assert!(!chunks.is_empty());
        for pair in chunks.windows(2) {
            assert!(pair[1].start_char > pair[0].start_char);
        }
    }

    #[test]
    #[should_panic(expected = "chunk size must be greater than overlap")]
    fn rejects_overlap_not_smaller_than_chunk_size() {
        let _ = Chunker::new(100, 100);
    }
}
