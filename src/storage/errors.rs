//! Storage error types
//!
//! I/O failures are recoverable (the operation fails, the store stays
//! usable). Corruption findings are fatal: the persisted state cannot be
//! trusted and the store refuses to open.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk I/O failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Persisted file exists but does not parse
    #[error("Malformed persisted state in {path}: {detail}")]
    Malformed { path: String, detail: String },

    /// Data file content does not match its recorded checksum
    #[error("Checksum mismatch in {path}")]
    ChecksumMismatch { path: String },

    /// The index references a data file that is not on disk
    #[error("Index references missing data file {path}")]
    MissingDataFile { path: String },
}

impl StorageError {
    /// Wrap an I/O failure with the path it occurred on
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Persisted content that does not parse
    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.display().to_string(),
            detail: detail.into(),
        }
    }

    /// Whether this error means the persisted state is corrupt
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. } | Self::ChecksumMismatch { .. } | Self::MissingDataFile { .. }
        )
    }
}
