//! Bundle of AI services injected into the request pipelines.

use super::{SharedAnswerGenerator, SharedOcrTranscriber, SharedTextEmbedder};

/// The AI services the ingestion and retrieval pipelines depend on.
///
/// Cheaply cloneable; constructed once at startup from the configured
/// providers and carried in the application state.
#[derive(Clone)]
pub struct AiServices {
    /// Embedding service for chunks and queries.
    pub embedder: SharedTextEmbedder,
    /// Grounded answer generation service.
    pub generator: SharedAnswerGenerator,
    /// OCR transcription fallback.
    pub ocr: SharedOcrTranscriber,
}

impl AiServices {
    /// Creates a new service bundle.
    pub fn new(
        embedder: SharedTextEmbedder,
        generator: SharedAnswerGenerator,
        ocr: SharedOcrTranscriber,
    ) -> Self {
        Self {
            embedder,
            generator,
            ocr,
        }
    }
}

impl std::fmt::Debug for AiServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiServices")
            .field("embedder", &self.embedder.model_name())
            .field("generator", &self.generator.model_name())
            .finish_non_exhaustive()
    }
}
