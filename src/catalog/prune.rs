//! Empty bucket and directory cleanup.
//!
//! Collect first with a read-only walk, then delete. The catalog root is never
//! removed, and the staging file is left alone because it is not a bucket.

use crate::bucket::BucketResolver;
use crate::store::MovieStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What a prune pass removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.removed_files.is_empty() && self.removed_dirs.is_empty()
    }
}

/// Remove empty bucket files and empty directories under the resolver's root.
///
/// A bucket file is empty when it holds no rows (a header alone counts as
/// empty). Individual removal failures are logged and skipped.
pub fn prune_empty(store: &dyn MovieStore, resolver: &BucketResolver) -> PruneReport {
    let root = resolver.root();
    let mut report = PruneReport::default();
    if !root.is_dir() {
        return report;
    }

    let (empty_files, mut empty_dirs) = collect_empty(store, resolver);

    for file in empty_files {
        match fs::remove_file(&file) {
            Ok(()) => report.removed_files.push(file),
            Err(e) => warn!(path = %file.display(), error = %e, "Failed to remove empty bucket file"),
        }
    }

    empty_dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    for dir in empty_dirs {
        match fs::remove_dir(&dir) {
            Ok(()) => report.removed_dirs.push(dir),
            Err(e) => warn!(path = %dir.display(), error = %e, "Failed to remove empty directory"),
        }
    }

    // Removals above can leave their parents empty.
    let removed: Vec<PathBuf> = report
        .removed_files
        .iter()
        .chain(report.removed_dirs.iter())
        .cloned()
        .collect();
    for entry in removed {
        let mut current = entry.parent().map(Path::to_path_buf);
        while let Some(dir) = current {
            if dir == root || !dir.starts_with(root) || !is_empty_dir(&dir) {
                break;
            }
            if let Err(e) = fs::remove_dir(&dir) {
                warn!(path = %dir.display(), error = %e, "Failed to remove empty ancestor");
                break;
            }
            current = dir.parent().map(Path::to_path_buf);
            report.removed_dirs.push(dir);
        }
    }

    if !report.is_empty() {
        debug!(
            files = report.removed_files.len(),
            dirs = report.removed_dirs.len(),
            "Pruned empty buckets"
        );
    }
    report
}

fn collect_empty(store: &dyn MovieStore, resolver: &BucketResolver) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(resolver.root()).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry while pruning");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() {
            if is_empty_dir(path) {
                dirs.push(path.to_path_buf());
            }
        } else if resolver.is_bucket_file(path) {
            match store.read(path) {
                Ok(rows) if rows.is_empty() => files.push(path.to_path_buf()),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Keeping unreadable bucket file"),
            }
        }
    }
    (files, dirs)
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::Movie;
    use crate::store::CsvStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BucketResolver, CsvStore) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Movies");
        fs::create_dir_all(&root).unwrap();
        (temp, BucketResolver::new(&root, "csv"), CsvStore::default())
    }

    #[test]
    fn test_header_only_bucket_and_ancestors_removed() {
        let (_temp, resolver, store) = setup();
        let dir = resolver.root().join("Drama/1990/short");
        fs::create_dir_all(&dir).unwrap();
        store.write(&dir.join("movies.csv"), &[]).unwrap();

        let report = prune_empty(&store, &resolver);
        assert_eq!(report.removed_files, vec![dir.join("movies.csv")]);
        assert!(!resolver.root().join("Drama").exists());
        assert!(resolver.root().exists());
    }

    #[test]
    fn test_non_empty_siblings_survive() {
        let (_temp, resolver, store) = setup();
        let keep = resolver.root().join("Drama/1990/long");
        let drop = resolver.root().join("Drama/1990/short");
        fs::create_dir_all(&keep).unwrap();
        fs::create_dir_all(&drop).unwrap();
        let movie = Movie::new("Ran", "Drama", "1990", "160", "8.2", "Akira Kurosawa", "Japanese");
        store.write(&keep.join("movies.csv"), &[movie]).unwrap();

        prune_empty(&store, &resolver);
        assert!(keep.join("movies.csv").exists());
        assert!(!drop.exists());
        assert!(resolver.root().join("Drama/1990").exists());
    }

    #[test]
    fn test_empty_staging_file_is_kept() {
        let (_temp, resolver, store) = setup();
        let staging = resolver.root().join("movies_unscrapped.csv");
        store.write(&staging, &[]).unwrap();

        let report = prune_empty(&store, &resolver);
        assert!(report.is_empty());
        assert!(staging.exists());
    }

    #[test]
    fn test_empty_root_is_never_removed() {
        let (_temp, resolver, store) = setup();
        fs::create_dir_all(resolver.root().join("Action/2000")).unwrap();

        let report = prune_empty(&store, &resolver);
        assert_eq!(report.removed_dirs.len(), 2);
        assert!(resolver.root().is_dir());
    }
}
