//! Collection Aggregator
//!
//! Discovery and reading are separate stages: [`discover_bucket_files`] is a
//! lazy walk that does no reads, and [`load_all`] reads what it yields.

use crate::bucket::BucketResolver;
use crate::movie::Movie;
use crate::store::MovieStore;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Depth of `<genre>/<year>/<class>/movies.<ext>` below root.
const BUCKET_DEPTH: usize = 4;

/// Bucket files under the resolver's root, in sorted traversal order.
///
/// Unreadable directories are logged and skipped. A missing root yields nothing.
/// Calling again restarts the walk.
pub fn discover_bucket_files(resolver: &BucketResolver) -> impl Iterator<Item = PathBuf> + '_ {
    let root = resolver.root();
    let walker = root.is_dir().then(|| {
        WalkDir::new(root)
            .min_depth(BUCKET_DEPTH)
            .max_depth(BUCKET_DEPTH)
            .sort_by_file_name()
            .into_iter()
    });

    walker
        .into_iter()
        .flatten()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry under catalog root");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(move |path| resolver.is_bucket_file(path))
}

/// Read every bucket file into one sequence.
///
/// Order is traversal order across buckets and row order within each file.
/// Files that fail to read or parse are logged and skipped.
pub fn load_all(store: &dyn MovieStore, resolver: &BucketResolver) -> Vec<Movie> {
    let mut movies = Vec::new();
    for path in discover_bucket_files(resolver) {
        match store.read(&path) {
            Ok(rows) => {
                debug!(path = %path.display(), rows = rows.len(), "Loaded bucket");
                movies.extend(rows);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable bucket file");
            }
        }
    }
    movies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CsvStore;
    use std::fs;
    use tempfile::TempDir;

    fn movie(name: &str, genre: &str, year: &str) -> Movie {
        Movie::new(name, genre, year, "100", "7.0", "Someone", "English")
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let resolver = BucketResolver::new(temp.path().join("Movies"), "csv");
        assert_eq!(discover_bucket_files(&resolver).count(), 0);
        assert!(load_all(&CsvStore::default(), &resolver).is_empty());
    }

    #[test]
    fn test_discovery_ignores_staging_and_strays() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Movies");
        let store = CsvStore::default();
        let resolver = BucketResolver::new(&root, "csv");

        let bucket = root.join("Drama/2001/medium");
        fs::create_dir_all(&bucket).unwrap();
        store.write(&bucket.join("movies.csv"), &[movie("A", "Drama", "2001")]).unwrap();
        store.write(&root.join("movies_unscrapped.csv"), &[movie("B", "Drama", "2001")]).unwrap();
        fs::write(bucket.join("notes.txt"), "ignore me").unwrap();
        fs::create_dir_all(root.join("Cartoons/2001/medium")).unwrap();
        fs::write(root.join("Cartoons/2001/medium/movies.csv"), "").unwrap();

        let found: Vec<_> = discover_bucket_files(&resolver).collect();
        assert_eq!(found, vec![bucket.join("movies.csv")]);
    }

    #[test]
    fn test_load_all_is_sorted_and_skips_bad_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Movies");
        let store = CsvStore::default();
        let resolver = BucketResolver::new(&root, "csv");

        for (genre, name) in [("Horror", "H"), ("Action", "A")] {
            let dir = root.join(genre).join("1999/medium");
            fs::create_dir_all(&dir).unwrap();
            store.write(&dir.join("movies.csv"), &[movie(name, genre, "1999")]).unwrap();
        }
        let broken = root.join("Comedy/1999/medium");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("movies.csv"), b"name,genre\n\xff\xfe,Comedy\n").unwrap();

        let names: Vec<String> = load_all(&store, &resolver)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["A".to_string(), "H".to_string()]);
    }

    #[test]
    fn test_discovery_is_restartable() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Movies");
        let dir = root.join("Action/2020/medium");
        fs::create_dir_all(&dir).unwrap();
        CsvStore::default().write(&dir.join("movies.csv"), &[]).unwrap();

        let resolver = BucketResolver::new(&root, "csv");
        assert_eq!(discover_bucket_files(&resolver).count(), 1);
        assert_eq!(discover_bucket_files(&resolver).count(), 1);
    }
}
