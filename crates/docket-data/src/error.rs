//! Metadata store error types.

use thiserror::Error;

/// Result type for metadata store operations.
pub type DataResult<T> = Result<T, DataError>;

/// Metadata store errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Document not found or not owned by the caller.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DataError {
    /// Creates a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<DataError> for docket_core::Error {
    fn from(err: DataError) -> Self {
        match &err {
            DataError::NotFound(message) => {
                docket_core::Error::not_found(message.clone()).with_source(err)
            }
            _ => docket_core::Error::storage("metadata store failure").with_source(err),
        }
    }
}
