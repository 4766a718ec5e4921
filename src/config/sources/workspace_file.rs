//! Workspace file source: `<workspace>/cinedex.toml`, optional.

use crate::config::WORKSPACE_CONFIG_FILE;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};

pub fn path_for(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace config file if present.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = path_for(workspace_root);
    if path.exists() {
        tracing::debug!(path = %path.display(), "Loading workspace config");
    }
    Ok(builder.add_source(File::from(path).required(false)))
}
