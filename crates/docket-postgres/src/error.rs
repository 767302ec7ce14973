//! Database error types.

use docket_data::DataError;
use thiserror::Error;

/// Result type for database operations.
pub type PgResult<T> = Result<T, PgError>;

/// Database errors.
#[derive(Debug, Error)]
pub enum PgError {
    /// Query execution error.
    #[error("query error: {0}")]
    Query(#[from] diesel::result::Error),

    /// Connection establishment error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Connection pool error.
    #[error("pool error: {0}")]
    Pool(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<PgError> for DataError {
    fn from(err: PgError) -> Self {
        match err {
            PgError::Query(diesel::result::Error::NotFound) => {
                DataError::not_found("record not found")
            }
            PgError::Connection(msg) | PgError::Pool(msg) => DataError::connection(msg),
            other => DataError::backend(other.to_string()),
        }
    }
}
