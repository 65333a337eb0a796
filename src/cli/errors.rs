//! CLI-specific error types

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::error::FacadeError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A facade operation failed
    #[error("{}: {}", .0.code(), .0)]
    Facade(#[from] FacadeError),

    /// A file argument could not be read
    #[error("Cannot read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A file argument did not contain JSON
    #[error("{path} is not valid JSON: {detail}")]
    FileNotJson { path: String, detail: String },
}

impl CliError {
    pub fn file_read(path: &Path, source: io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn file_not_json(path: &Path, detail: impl Into<String>) -> Self {
        Self::FileNotJson {
            path: path.display().to_string(),
            detail: detail.into(),
        }
    }
}
