//! AI service abstractions.
//!
//! This module defines the traits the pipelines depend on for embedding,
//! grounded answer generation and OCR transcription, without depending on
//! any concrete provider implementation. Provider crates implement these
//! traits; tests use the deterministic mocks behind the `test-utils`
//! feature.

mod emb;
mod generate;
mod ocr;
mod services;

pub use emb::{SharedTextEmbedder, TextEmbedder};
pub use generate::{AnswerGenerator, SharedAnswerGenerator};
pub use ocr::{OcrTranscriber, SharedOcrTranscriber};
pub use services::AiServices;
