//! Text embedding abstraction.

use std::sync::Arc;

use crate::error::Result;

/// Type alias for a shared embedding service.
pub type SharedTextEmbedder = Arc<dyn TextEmbedder>;

/// Converts text into fixed-dimension embedding vectors.
///
/// Implementations must return vectors of exactly [`dimensions`] length
/// and preserve input order in [`embed_many`].
///
/// [`dimensions`]: TextEmbedder::dimensions
/// [`embed_many`]: TextEmbedder::embed_many
#[async_trait::async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Returns the fixed output dimensionality.
    fn dimensions(&self) -> usize;

    /// Returns the backing model name.
    fn model_name(&self) -> &str;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds a batch of texts, preserving order.
    async fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}
