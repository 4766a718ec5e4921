//! Error types for the catalog.
//!
//! `StorageError` covers the flat-file layer, `CatalogError` is what engine and
//! CLI operations return.

use crate::movie::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the flat-file store and filesystem walks.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl StorageError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        StorageError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Top-level error for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Staging file not found: {}", .0.display())]
    StagingNotFound(PathBuf),

    #[error("Invalid movie: {0}")]
    InvalidMovie(#[from] ValidationError),

    #[error("Movie already exists: {0}")]
    DuplicateMovie(String),

    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for CatalogError {
    fn from(err: config::ConfigError) -> Self {
        CatalogError::ConfigError(err.to_string())
    }
}
