//! Answer generation abstraction.

use std::sync::Arc;

use crate::error::Result;

/// Type alias for a shared answer generation service.
pub type SharedAnswerGenerator = Arc<dyn AnswerGenerator>;

/// Generates text from a fully assembled prompt.
///
/// The retrieval pipeline owns prompt construction (context block,
/// grounding instructions); implementations are opaque prompt-to-text
/// functions.
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Returns the backing model name.
    fn model_name(&self) -> &str;

    /// Generates a response for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
