//! Error types shared across the Docket pipeline crates.
//!
//! Gateway crates carry their own `thiserror` enums; at the pipeline
//! boundary everything converges into [`Error`], a kind-tagged error with
//! an optional boxed source for diagnostics.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for pipeline operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing pipeline errors.
///
/// Separated from [`Error`] so callers can match on the category without
/// destructuring the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input validation failures (bad file type, oversized payloads).
    Validation,
    /// Text extraction failures, including exhausted OCR fallback.
    Extraction,
    /// Embedding generation failures.
    Embedding,
    /// Answer generation failures.
    Generation,
    /// Vector index communication failures.
    VectorStore,
    /// Blob or metadata storage failures.
    Storage,
    /// A referenced resource (document, namespace, index) does not exist.
    NotFound,
    /// A bounded wait elapsed without the operation completing.
    Timeout,
    /// Failures of other external collaborators.
    External,
    /// Internal invariant violations.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Extraction => "extraction",
            Self::Embedding => "embedding",
            Self::Generation => "generation",
            Self::VectorStore => "vector_store",
            Self::Storage => "storage",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::External => "external_service",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    /// The error category.
    kind: ErrorKind,
    /// Human-readable error message.
    message: Cow<'static, str>,
    /// Optional underlying error that caused this error.
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`].
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error, enabling error chain tracking.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new validation error.
    #[inline]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a new extraction error.
    #[inline]
    pub fn extraction(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Extraction, message)
    }

    /// Creates a new embedding error.
    #[inline]
    pub fn embedding(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Embedding, message)
    }

    /// Creates a new generation error.
    #[inline]
    pub fn generation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Generation, message)
    }

    /// Creates a new vector store error.
    #[inline]
    pub fn vector_store(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::VectorStore, message)
    }

    /// Creates a new storage error.
    #[inline]
    pub fn storage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Creates a new not-found error.
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a new timeout error.
    #[inline]
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a new external service error.
    #[inline]
    pub fn external(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::External, full_message)
    }

    /// Creates a new internal error.
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_creation() {
        let error = Error::validation("file too large");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.message(), "file too large");
    }

    #[test]
    fn error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::storage("cannot read upload").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Storage);
    }

    #[test]
    fn external_service_error() {
        let error = Error::external("pinecone", "connection refused");

        assert_eq!(error.kind(), ErrorKind::External);
        assert!(error.to_string().contains("pinecone"));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn error_kind_as_str() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::VectorStore.as_str(), "vector_store");
        assert_eq!(ErrorKind::External.as_str(), "external_service");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
