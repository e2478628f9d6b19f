//! Storage errors

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum DbError {
    /// A unique key is already taken
    #[error("duplicate key: {0}")]
    Conflict(String),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Backend could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for storage operations
pub type DbResult<T> = Result<T, DbError>;
