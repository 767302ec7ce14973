//! OCR client error types.

use thiserror::Error as ThisError;

/// Result type for OCR client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// OCR client errors.
#[derive(Debug, ThisError)]
pub enum Error {
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The service responded with a non-success status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The uploaded file never reached the ready state within the bound.
    #[error("processing timed out for file {0}")]
    ProcessingTimeout(String),

    /// The service reported the uploaded file as failed.
    #[error("processing failed for file {0}")]
    ProcessingFailed(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Creates an API error from a status code and message.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl From<Error> for docket_core::Error {
    fn from(err: Error) -> Self {
        match &err {
            Error::ProcessingTimeout(_) => {
                docket_core::Error::timeout("ocr processing timed out").with_source(err)
            }
            _ => docket_core::Error::extraction("ocr transcription failed").with_source(err),
        }
    }
}
