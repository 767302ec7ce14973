//! Object storage error types.

use thiserror::Error;

/// Result type for object storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend operation failure.
    #[error("storage error: {0}")]
    Backend(#[from] opendal::Error),
}

impl StorageError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<StorageError> for docket_core::Error {
    fn from(err: StorageError) -> Self {
        docket_core::Error::storage("blob storage failure").with_source(err)
    }
}
