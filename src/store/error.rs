//! Store error types

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading or writing the catalog, profile and log documents
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Ingredient not found: {0}")]
    NotFound(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }

    pub fn format(path: &Path, message: impl ToString) -> Self {
        StoreError::Format { path: path.to_path_buf(), message: message.to_string() }
    }
}
