//! StorageConfig and resolve_paths for the catalog layout.

use crate::error::CatalogError;
use crate::store::TextEncoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Only comma-delimited tabular text is supported.
pub const SUPPORTED_FORMAT: &str = "csv";

fn default_root() -> PathBuf {
    PathBuf::from("Movies")
}

fn default_staging_file() -> PathBuf {
    PathBuf::from("Movies/movies_unscrapped.csv")
}

fn default_encoding() -> String {
    "utf-8-sig".to_string()
}

fn default_file_format() -> String {
    SUPPORTED_FORMAT.to_string()
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket hierarchy root (relative to workspace root)
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Staging file holding uncategorized movies (relative to workspace root)
    #[serde(default = "default_staging_file")]
    pub staging_file: PathBuf,

    /// Text encoding name: utf-8 or utf-8-sig
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Record file format tag, also used as the bucket file extension
    #[serde(default = "default_file_format")]
    pub file_format: String,
}

/// Absolute locations derived from a `StorageConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub workspace_root: PathBuf,
    pub root: PathBuf,
    pub staging_file: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.text_encoding()?;
        if self.file_format != SUPPORTED_FORMAT {
            return Err(CatalogError::ConfigError(format!(
                "Unsupported file format '{}' (only '{}' is supported)",
                self.file_format, SUPPORTED_FORMAT
            )));
        }
        if self.root.as_os_str().is_empty() || self.staging_file.as_os_str().is_empty() {
            return Err(CatalogError::ConfigError(
                "storage.root and storage.staging_file cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn text_encoding(&self) -> Result<TextEncoding, CatalogError> {
        self.encoding.parse().map_err(CatalogError::ConfigError)
    }

    /// Resolve storage paths against the workspace root.
    pub fn resolve_paths(&self, workspace_root: &Path) -> Result<StoragePaths, CatalogError> {
        let workspace_root = dunce::canonicalize(workspace_root).map_err(|e| {
            CatalogError::ConfigError(format!(
                "Failed to canonicalize workspace path {}: {}",
                workspace_root.display(),
                e
            ))
        })?;
        Ok(StoragePaths {
            root: workspace_root.join(&self.root),
            staging_file: workspace_root.join(&self.staging_file),
            workspace_root,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            staging_file: default_staging_file(),
            encoding: default_encoding(),
            file_format: default_file_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_paths_joins_workspace() {
        let temp = TempDir::new().unwrap();
        let paths = StorageConfig::default().resolve_paths(temp.path()).unwrap();
        let canonical = dunce::canonicalize(temp.path()).unwrap();
        assert_eq!(paths.root, canonical.join("Movies"));
        assert_eq!(
            paths.staging_file,
            canonical.join("Movies").join("movies_unscrapped.csv")
        );
    }

    #[test]
    fn test_resolve_paths_missing_workspace_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(StorageConfig::default().resolve_paths(&missing).is_err());
    }

    #[test]
    fn test_validate_encoding() {
        let mut config = StorageConfig::default();
        assert!(config.validate().is_ok());
        config.encoding = "cp1252".to_string();
        assert!(matches!(
            config.validate(),
            Err(CatalogError::ConfigError(msg)) if msg.contains("cp1252")
        ));
    }
}
