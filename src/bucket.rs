//! Bucket Path Resolver
//!
//! Maps a (genre, year, duration class) key to its directory under the catalog
//! root: `<root>/<genre>/<year>/<class>/movies.<ext>`. Pure path arithmetic; callers
//! create directories themselves.

use crate::movie::{DurationClass, Genre, ValidatedMovie};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// File stem shared by every bucket file.
pub const BUCKET_FILE_STEM: &str = "movies";

/// Identity of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub genre: Genre,
    pub year: u32,
    pub duration_class: DurationClass,
}

impl BucketKey {
    pub fn new(genre: Genre, year: u32, duration_class: DurationClass) -> Self {
        Self {
            genre,
            year,
            duration_class,
        }
    }
}

impl From<&ValidatedMovie> for BucketKey {
    fn from(movie: &ValidatedMovie) -> Self {
        BucketKey::new(movie.genre, movie.year, movie.duration_class())
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.genre, self.year, self.duration_class)
    }
}

/// Resolves bucket keys to locations under a fixed root.
#[derive(Debug, Clone)]
pub struct BucketResolver {
    root: PathBuf,
    file_name: String,
}

impl BucketResolver {
    /// `extension` is the record file format tag, e.g. `csv`.
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            file_name: format!("{}.{}", BUCKET_FILE_STEM, extension),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the bucket.
    pub fn resolve(&self, genre: Genre, year: u32, duration_class: DurationClass) -> PathBuf {
        self.root
            .join(genre.as_str())
            .join(year.to_string())
            .join(duration_class.as_str())
    }

    pub fn bucket_dir(&self, key: &BucketKey) -> PathBuf {
        self.resolve(key.genre, key.year, key.duration_class)
    }

    pub fn bucket_file(&self, key: &BucketKey) -> PathBuf {
        self.bucket_dir(key).join(&self.file_name)
    }

    /// True for `<root>/<genre>/<year>/<class>/movies.<ext>` with a known genre
    /// and class. Anything else under root (the staging file included) is not a bucket.
    pub fn is_bucket_file(&self, path: &Path) -> bool {
        self.key_for_file(path).is_some()
    }

    /// Parse a bucket file path back into its key.
    pub fn key_for_file(&self, path: &Path) -> Option<BucketKey> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        let [genre, year, class, file] = parts.as_slice() else {
            return None;
        };
        if *file != self.file_name {
            return None;
        }
        let year_value: u32 = year.parse().ok()?;
        // Non-canonical year directories ("02020") are not buckets.
        if year_value.to_string() != *year {
            return None;
        }
        Some(BucketKey::new(
            genre.parse().ok()?,
            year_value,
            class.parse().ok()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BucketResolver {
        BucketResolver::new("/data/Movies", "csv")
    }

    #[test]
    fn test_resolve_nests_genre_year_class() {
        let dir = resolver().resolve(Genre::Action, 2020, DurationClass::Medium);
        assert_eq!(dir, PathBuf::from("/data/Movies/Action/2020/medium"));
    }

    #[test]
    fn test_bucket_file_round_trips_to_key() {
        let r = resolver();
        let key = BucketKey::new(Genre::ScienceFiction, 1982, DurationClass::Long);
        let file = r.bucket_file(&key);
        assert_eq!(
            file,
            PathBuf::from("/data/Movies/Science Fiction/1982/long/movies.csv")
        );
        assert_eq!(r.key_for_file(&file), Some(key));
    }

    #[test]
    fn test_staging_and_strays_are_not_buckets() {
        let r = resolver();
        assert!(!r.is_bucket_file(Path::new("/data/Movies/movies_unscrapped.csv")));
        assert!(!r.is_bucket_file(Path::new("/data/Movies/Action/2020/medium/other.csv")));
        assert!(!r.is_bucket_file(Path::new("/data/Movies/Sci-Fi/2020/medium/movies.csv")));
        assert!(!r.is_bucket_file(Path::new("/data/Movies/Action/02020/medium/movies.csv")));
        assert!(!r.is_bucket_file(Path::new("/elsewhere/Action/2020/medium/movies.csv")));
    }
}
