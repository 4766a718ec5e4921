//! Flat-File Record Store
//!
//! Reads and writes ordered collections of movies in tabular text files.
//! Every write is a single-pass rewrite of the whole file, with no temp file
//! and no rename. A crash mid-write can leave a torn file.

pub mod csv_store;

use crate::error::StorageError;
use crate::movie::Movie;
use std::path::Path;
use std::str::FromStr;

pub use csv_store::CsvStore;

/// Text encoding of record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain UTF-8.
    Utf8,
    /// UTF-8 with a byte order mark written at the start of new files.
    Utf8Sig,
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8Sig),
            other => Err(format!(
                "Unsupported encoding '{}' (must be 'utf-8' or 'utf-8-sig')",
                other
            )),
        }
    }
}

/// A row whose bytes could not be decoded into a movie.
///
/// `movie` holds a lossy copy of the row so it can be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub line: u64,
    pub movie: Movie,
    pub reason: String,
}

/// Record store interface.
pub trait MovieStore: Send + Sync {
    /// Read all records. A missing file reads as empty.
    fn read(&self, path: &Path) -> Result<Vec<Movie>, StorageError>;

    /// Read all records, failing with `StorageError::NotFound` if the file is absent.
    fn read_required(&self, path: &Path) -> Result<Vec<Movie>, StorageError>;

    /// Read every row of an existing file in order, keeping rows that fail to
    /// decode instead of failing the whole read.
    fn read_rows(&self, path: &Path) -> Result<Vec<Result<Movie, MalformedRow>>, StorageError> {
        Ok(self.read_required(path)?.into_iter().map(Ok).collect())
    }

    /// Overwrite the file with a header and the given records.
    fn write(&self, path: &Path, movies: &[Movie]) -> Result<(), StorageError>;

    /// Append one record, writing the header first if the file is new.
    fn append(&self, path: &Path, movie: &Movie) -> Result<(), StorageError>;
}
