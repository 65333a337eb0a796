//! Ingestion error types

use thiserror::Error;

/// Result type for parser collaborators
pub type ParseResult<T> = Result<T, ParseError>;

/// Dataset content rejection
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Content could not be decoded at all
    #[error("Dataset content is not decodable: {0}")]
    Undecodable(String),

    /// Content decoded but produced no valid records
    #[error("Invalid dataset")]
    NoValidRecords,
}
