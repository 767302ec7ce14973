//! Embedding provider abstraction.
//!
//! Wraps the supported rig embedding models into a unified enum,
//! eliminating the need for generic parameters throughout the codebase.

use docket_core::TextEmbedder;
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::{gemini, openai};

use crate::Error;

/// Default embedding dimensionality used across the platform.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// Embedding provider that wraps different rig model implementations.
pub enum EmbeddingProvider {
    /// OpenAI embedding model.
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
    },
    /// Gemini embedding model.
    Gemini {
        model: gemini::embedding::EmbeddingModel,
        model_name: String,
    },
}

impl EmbeddingProvider {
    /// Creates an OpenAI embedding provider.
    pub fn openai(api_key: &str, model_name: &str, dimensions: usize) -> Result<Self, Error> {
        let client = openai::Client::new(api_key)
            .map_err(|e| Error::provider("openai", e.to_string()))?;

        Ok(Self::OpenAi {
            model: client.embedding_model_with_ndims(model_name, dimensions),
            model_name: model_name.to_string(),
        })
    }

    /// Creates a Gemini embedding provider.
    pub fn gemini(api_key: &str, model_name: &str, dimensions: usize) -> Result<Self, Error> {
        let client = gemini::Client::new(api_key)
            .map_err(|e| Error::provider("gemini", e.to_string()))?;

        Ok(Self::Gemini {
            model: client.embedding_model_with_ndims(model_name, dimensions),
            model_name: model_name.to_string(),
        })
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Gemini { .. } => "gemini",
        }
    }
}

#[async_trait::async_trait]
impl TextEmbedder for EmbeddingProvider {
    fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi { model, .. } => model.ndims(),
            Self::Gemini { model, .. } => model.ndims(),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Self::OpenAi { model_name, .. } => model_name,
            Self::Gemini { model_name, .. } => model_name,
        }
    }

    async fn embed(&self, text: &str) -> docket_core::Result<Vec<f32>> {
        let embedding = match self {
            Self::OpenAi { model, .. } => model.embed_text(text).await,
            Self::Gemini { model, .. } => model.embed_text(text).await,
        }
        .map_err(|e| {
            docket_core::Error::embedding(format!("{}: {}", self.provider_name(), e))
        })?;

        Ok(embedding.vec.iter().map(|&x| x as f32).collect())
    }

    async fn embed_many(&self, texts: Vec<String>) -> docket_core::Result<Vec<Vec<f32>>> {
        let embeddings = match self {
            Self::OpenAi { model, .. } => model.embed_texts(texts).await,
            Self::Gemini { model, .. } => model.embed_texts(texts).await,
        }
        .map_err(|e| {
            docket_core::Error::embedding(format!("{}: {}", self.provider_name(), e))
        })?;

        Ok(embeddings
            .into_iter()
            .map(|embedding| embedding.vec.iter().map(|&x| x as f32).collect())
            .collect())
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &TextEmbedder::model_name(self))
            .field("ndims", &self.dimensions())
            .finish()
    }
}
