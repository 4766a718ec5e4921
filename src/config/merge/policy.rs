//! Base builder for every config load.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Start a builder. Field defaults live on the serde structs, so an empty
/// source stack still deserializes to `CatalogConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(config::Config::builder())
}
