//! OCR transcription abstraction.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Type alias for a shared OCR transcription service.
pub type SharedOcrTranscriber = Arc<dyn OcrTranscriber>;

/// Transcribes a file into plain text via a vision-capable model.
///
/// Implementations operate on a durable local copy of the upload because
/// the external transcription APIs require file-handle semantics.
#[async_trait::async_trait]
pub trait OcrTranscriber: Send + Sync {
    /// Transcribes the file at `path`, returning the raw transcription.
    async fn transcribe(&self, path: &Path, content_type: &str) -> Result<String>;
}
