//! Completion provider abstraction.

use rig::prelude::CompletionClient;
use rig::providers::{gemini, openai};

use crate::Error;

/// Completion provider that wraps different rig model implementations.
pub enum CompletionProvider {
    /// OpenAI completion model.
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    /// Gemini completion model.
    Gemini {
        model: gemini::completion::CompletionModel,
        model_name: String,
    },
}

impl CompletionProvider {
    /// Creates an OpenAI completion provider.
    pub fn openai(api_key: &str, model_name: &str) -> Result<Self, Error> {
        let client = openai::Client::new(api_key)
            .map_err(|e| Error::provider("openai", e.to_string()))?
            .completions_api();

        Ok(Self::OpenAi {
            model: client.completion_model(model_name),
            model_name: model_name.to_string(),
        })
    }

    /// Creates a Gemini completion provider.
    pub fn gemini(api_key: &str, model_name: &str) -> Result<Self, Error> {
        let client = gemini::Client::new(api_key)
            .map_err(|e| Error::provider("gemini", e.to_string()))?;

        Ok(Self::Gemini {
            model: client.completion_model(model_name),
            model_name: model_name.to_string(),
        })
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        match self {
            Self::OpenAi { model_name, .. } => model_name,
            Self::Gemini { model_name, .. } => model_name,
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Gemini { .. } => "gemini",
        }
    }
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}
