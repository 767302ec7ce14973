//! Provider error types.

use thiserror::Error as ThisError;

/// Result type for provider operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Provider errors.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Underlying model provider failure.
    #[error("{provider} provider error: {message}")]
    Provider {
        /// Provider name (e.g. `openai`).
        provider: &'static str,
        /// Provider-reported message.
        message: String,
    },

    /// Invalid provider configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<Error> for docket_core::Error {
    fn from(err: Error) -> Self {
        docket_core::Error::external("model provider", err.to_string()).with_source(err)
    }
}
