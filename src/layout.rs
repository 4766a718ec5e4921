//! Workspace layout
//!
//! Makes sure the catalog root and the staging file exist before a session.
//! A staging file left elsewhere in the workspace is moved into place.

use crate::config::StoragePaths;
use crate::error::{CatalogError, StorageError};
use crate::store::MovieStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// How deep below the workspace root a misplaced staging file is looked for.
pub const SEARCH_DEPTH: usize = 4;

/// What happened to the staging file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StagingAction {
    /// Already at the configured location.
    Present,
    /// Found elsewhere in the workspace and moved.
    Moved { from: PathBuf },
    /// Not found anywhere; created with a header only.
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub root: PathBuf,
    pub root_created: bool,
    pub staging_file: PathBuf,
    pub staging: StagingAction,
}

pub fn prepare_workspace(
    paths: &StoragePaths,
    store: &dyn MovieStore,
) -> Result<LayoutReport, CatalogError> {
    let root_created = !paths.root.is_dir();
    if root_created {
        fs::create_dir_all(&paths.root).map_err(|e| StorageError::io(&paths.root, e))?;
        info!(root = %paths.root.display(), "Created catalog root");
    }

    let staging = if paths.staging_file.is_file() {
        StagingAction::Present
    } else {
        if let Some(parent) = paths.staging_file.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        match find_misplaced(&paths.workspace_root, &paths.staging_file) {
            Some(found) => {
                move_file(&found, &paths.staging_file)?;
                info!(from = %found.display(), to = %paths.staging_file.display(), "Moved staging file");
                StagingAction::Moved { from: found }
            }
            None => {
                store.write(&paths.staging_file, &[])?;
                info!(path = %paths.staging_file.display(), "Created staging file");
                StagingAction::Created
            }
        }
    };

    Ok(LayoutReport {
        root: paths.root.clone(),
        root_created,
        staging_file: paths.staging_file.clone(),
        staging,
    })
}

/// First file under `workspace` whose name matches the staging file's name,
/// ignoring case. Hidden directories are not searched.
fn find_misplaced(workspace: &Path, staging_file: &Path) -> Option<PathBuf> {
    let wanted = staging_file.file_name()?.to_str()?.to_lowercase();
    WalkDir::new(workspace)
        .max_depth(SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry while searching for staging file");
                None
            }
        })
        .find(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.to_lowercase() == wanted)
        })
        .map(DirEntry::into_path)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Rename, falling back to copy and remove across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), StorageError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| StorageError::io(to, e))?;
    fs::remove_file(from).map_err(|e| StorageError::io(from, e))
}
