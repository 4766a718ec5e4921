//! Environment variable source: CINEDEX prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix of every catalog environment variable.
pub const ENV_PREFIX: &str = "CINEDEX";

/// Add environment variable overlay to builder.
/// `CINEDEX__STORAGE__ROOT=/srv/movies` sets `storage.root`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
