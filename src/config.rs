//! Configuration
//!
//! Layered catalog configuration: built-in defaults, an optional workspace
//! `cinedex.toml`, then `CINEDEX__*` environment variables. Loaded once at
//! startup and handed to every component by reference.

pub mod facade;
pub mod merge;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use workspace::storage_paths::{StorageConfig, StoragePaths};

use crate::error::CatalogError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Name of the per-workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "cinedex.toml";

/// Root configuration value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CatalogConfig {
    /// Check values the engine cannot work with.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.storage.validate()
    }
}
