//! Mock implementations of the AI service traits for testing.
//!
//! The mock provider returns deterministic embeddings derived from the
//! input text, configurable answer and transcription text, and counts how
//! often each service was invoked so tests can assert on call behavior
//! (e.g. the no-hallucination guard never reaching the generator).
//!
//! Only available behind the `test-utils` feature.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::ai::{AiServices, AnswerGenerator, OcrTranscriber, TextEmbedder};
use crate::error::{Error, Result};

/// Configuration for the mock provider.
#[derive(Debug, Clone)]
pub struct MockAiConfig {
    /// Dimensions of mock embedding vectors.
    pub dimensions: usize,
    /// Answer returned for generation requests.
    pub answer_text: Option<String>,
    /// Text returned for transcription requests.
    pub transcript_text: Option<String>,
}

impl Default for MockAiConfig {
    fn default() -> Self {
        Self {
            dimensions: 8,
            answer_text: None,
            transcript_text: None,
        }
    }
}

/// Deterministic mock implementing all AI service traits.
pub struct MockAiProvider {
    config: MockAiConfig,
    failing_texts: RwLock<HashSet<String>>,
    embed_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    transcribe_calls: AtomicUsize,
}

impl MockAiProvider {
    /// Creates a mock provider with the given configuration.
    pub fn new(config: MockAiConfig) -> Self {
        Self {
            config,
            failing_texts: RwLock::new(HashSet::new()),
            embed_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            transcribe_calls: AtomicUsize::new(0),
        }
    }

    /// Marks a text as failing: embedding it (alone or in a batch) errors.
    pub fn fail_embedding_of(&self, text: impl Into<String>) {
        self.failing_texts
            .write()
            .expect("failing text set poisoned")
            .insert(text.into());
    }

    /// Number of embedding requests served (single or batch).
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Number of generation requests served.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Number of transcription requests served.
    pub fn transcribe_calls(&self) -> usize {
        self.transcribe_calls.load(Ordering::SeqCst)
    }

    /// Wraps this provider into an [`AiServices`] bundle.
    pub fn into_services(self: Arc<Self>) -> AiServices {
        AiServices::new(self.clone(), self.clone(), self)
    }

    fn is_failing(&self, text: &str) -> bool {
        self.failing_texts
            .read()
            .expect("failing text set poisoned")
            .contains(text)
    }

    /// Deterministic vector for a text: same input, same output.
    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut seed = 1469598103u32;
        for byte in text.bytes() {
            seed = seed.wrapping_mul(31).wrapping_add(byte as u32);
        }

        (0..self.config.dimensions)
            .map(|i| {
                let mixed = seed.wrapping_add((i as u32).wrapping_mul(2654435761));
                (mixed % 1000) as f32 / 1000.0 - 0.5
            })
            .collect()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new(MockAiConfig::default())
    }
}

#[async_trait::async_trait]
impl TextEmbedder for MockAiProvider {
    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        if self.is_failing(text) {
            return Err(Error::embedding("mock embedding failure"));
        }

        Ok(self.vector_for(text))
    }

    async fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        if texts.iter().any(|text| self.is_failing(text)) {
            return Err(Error::embedding("mock batch embedding failure"));
        }

        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for MockAiProvider {
    fn model_name(&self) -> &str {
        "mock-completion"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .config
            .answer_text
            .clone()
            .unwrap_or_else(|| "Mock answer based on the provided context.".to_string()))
    }
}

#[async_trait::async_trait]
impl OcrTranscriber for MockAiProvider {
    async fn transcribe(&self, _path: &Path, _content_type: &str) -> Result<String> {
        self.transcribe_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self.config.transcript_text.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let mock = MockAiProvider::default();

        let first = mock.embed("termination clause").await.unwrap();
        let second = mock.embed("termination clause").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), mock.dimensions());
        assert_eq!(mock.embed_calls(), 2);
    }

    #[tokio::test]
    async fn failing_text_poisons_batches() {
        let mock = MockAiProvider::default();
        mock.fail_embedding_of("bad chunk");

        assert!(mock.embed("bad chunk").await.is_err());
        assert!(
            mock.embed_many(vec!["ok".to_string(), "bad chunk".to_string()])
                .await
                .is_err()
        );
        assert!(mock.embed_many(vec!["ok".to_string()]).await.is_ok());
    }

    #[tokio::test]
    async fn counts_generation_calls() {
        let mock = Arc::new(MockAiProvider::new(MockAiConfig {
            answer_text: Some("configured".to_string()),
            ..MockAiConfig::default()
        }));

        assert_eq!(mock.generate_calls(), 0);
        let answer = mock.generate("prompt").await.unwrap();
        assert_eq!(answer, "configured");
        assert_eq!(mock.generate_calls(), 1);
    }
}
