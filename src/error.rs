//! Caller-facing error types
//!
//! Every public facade operation fails with exactly one of these kinds.
//! Internal invariant violations (states the validator is required to prevent)
//! are not represented here; they abort via `unreachable!` instead of being
//! surfaced as recoverable errors.

use thiserror::Error;

use crate::engine::RESULT_ROW_LIMIT;
use crate::storage::StorageError;

/// Result type for facade operations
pub type FacadeResult<T> = Result<T, FacadeError>;

/// Errors surfaced to callers of the dataset facade
#[derive(Debug, Error)]
pub enum FacadeError {
    /// Malformed query structure, grammar violation, cross-dataset reference,
    /// or reference to a dataset that was never added
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The filtered (and transformed) result set exceeded the row cap
    #[error("Cannot process more than {RESULT_ROW_LIMIT} entries")]
    ResultTooLarge,

    /// Removal of a dataset id that is not currently held
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed dataset id or content on add, duplicate id, or a duplicate
    /// in-flight job for the same id
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Durable store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FacadeError {
    /// Create an invalid-query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Stable error code for a request layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::ResultTooLarge => "RESULT_TOO_LARGE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
