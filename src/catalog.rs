//! Mutation Engine
//!
//! `MovieCatalog` owns the in-memory collection aggregated from the buckets and
//! keeps the bucket files in line with it on add, update and delete. Memory is
//! the source of truth: a failed file step in `update` or `delete` restores the
//! previous in-memory state before the error is returned. Disk writes are not
//! transactional, so files touched before the failure stay as written.

pub mod prune;

pub use prune::{prune_empty, PruneReport};

use crate::aggregate::{discover_bucket_files, load_all};
use crate::bucket::{BucketKey, BucketResolver};
use crate::error::{CatalogError, StorageError};
use crate::movie::{classify_duration, identical, validate, Attribute, DurationClass, Genre, Movie};
use crate::store::MovieStore;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub previous: Movie,
    pub updated: Movie,
    pub bucket: BucketKey,
    /// False when the original record was not in any bucket file.
    pub found_on_disk: bool,
    pub pruned: PruneReport,
}

/// Result of a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub removed: Movie,
    pub files_rewritten: Vec<PathBuf>,
    pub files_removed: Vec<PathBuf>,
    /// Set when the record was in memory but in no bucket file.
    pub warning: Option<String>,
    pub pruned: PruneReport,
}

pub struct MovieCatalog {
    movies: Vec<Movie>,
    store: Arc<dyn MovieStore>,
    resolver: BucketResolver,
}

impl MovieCatalog {
    /// An empty catalog; call [`MovieCatalog::reload`] to read the buckets.
    pub fn new(store: Arc<dyn MovieStore>, resolver: BucketResolver) -> Self {
        Self {
            movies: Vec::new(),
            store,
            resolver,
        }
    }

    /// Aggregate every bucket under the resolver's root.
    pub fn load(store: Arc<dyn MovieStore>, resolver: BucketResolver) -> Self {
        let mut catalog = Self::new(store, resolver);
        catalog.reload();
        catalog
    }

    /// Re-read all buckets, replacing the in-memory collection.
    pub fn reload(&mut self) {
        self.movies = load_all(self.store.as_ref(), &self.resolver);
        info!(movies = self.movies.len(), root = %self.resolver.root().display(), "Catalog loaded");
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn resolver(&self) -> &BucketResolver {
        &self.resolver
    }

    /// Validate and file a new movie. Returns the bucket it went to.
    pub fn add(&mut self, movie: Movie) -> Result<BucketKey, CatalogError> {
        let movie = movie.normalized();
        let checked = validate(&movie)?;
        if self.movies.iter().any(|m| identical(m, &movie)) {
            return Err(CatalogError::DuplicateMovie(movie.name));
        }

        let key = BucketKey::from(&checked);
        let dir = self.resolver.bucket_dir(&key);
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        self.store.append(&self.resolver.bucket_file(&key), &movie)?;

        info!(movie = %movie.name, bucket = %key, "Movie added");
        self.movies.push(movie);
        Ok(key)
    }

    /// First in-memory movie matching all four criteria.
    ///
    /// The name is compared trimmed and case-insensitively. Rows whose year or
    /// duration do not parse never match.
    pub fn find_by_criteria(
        &self,
        name: &str,
        genre: Genre,
        year: u32,
        duration_class: DurationClass,
    ) -> Option<&Movie> {
        let wanted = name.trim().to_lowercase();
        self.movies.iter().find(|m| {
            m.name.trim().to_lowercase() == wanted
                && m.genre.trim() == genre.as_str()
                && m.year.trim().parse::<u32>().ok() == Some(year)
                && m.duration
                    .trim()
                    .parse::<u32>()
                    .map(classify_duration)
                    .ok()
                    == Some(duration_class)
        })
    }

    /// Change one attribute of `movie`, relocating it if its bucket changes.
    ///
    /// The whole updated record is re-validated, and an update that would make
    /// it identical to another movie in the catalog is rejected.
    pub fn update(
        &mut self,
        movie: &Movie,
        attribute: Attribute,
        new_value: &str,
    ) -> Result<UpdateOutcome, CatalogError> {
        let index = self
            .position(movie)
            .ok_or_else(|| CatalogError::MovieNotFound(movie.name.clone()))?;

        let mut trial = self.movies[index].clone();
        trial.set(attribute, new_value);
        let trial = trial.normalized();
        let checked = validate(&trial)?;
        let collides = self
            .movies
            .iter()
            .enumerate()
            .any(|(i, m)| i != index && identical(m, &trial));
        if collides {
            return Err(CatalogError::DuplicateMovie(trial.name));
        }

        let key = BucketKey::from(&checked);
        let previous = std::mem::replace(&mut self.movies[index], trial.clone());
        match self.relocate(&previous, &trial, &key) {
            Ok(found_on_disk) => {
                if !found_on_disk {
                    warn!(movie = %previous.name, "Updated movie was not found in any bucket file");
                }
                let pruned = prune_empty(self.store.as_ref(), &self.resolver);
                info!(movie = %trial.name, %attribute, bucket = %key, "Movie updated");
                Ok(UpdateOutcome {
                    previous,
                    updated: trial,
                    bucket: key,
                    found_on_disk,
                    pruned,
                })
            }
            Err(e) => {
                warn!(movie = %previous.name, error = %e, "Update failed, restoring previous record");
                self.movies[index] = previous;
                Err(e.into())
            }
        }
    }

    /// Remove `movie` from memory and from every bucket file holding it.
    pub fn delete(&mut self, movie: &Movie) -> Result<DeleteOutcome, CatalogError> {
        let index = self
            .position(movie)
            .ok_or_else(|| CatalogError::MovieNotFound(movie.name.clone()))?;
        let removed = self.movies.remove(index);

        let mut files_rewritten = Vec::new();
        let mut files_removed = Vec::new();
        if let Err(e) = self.remove_from_files(&removed, &mut files_rewritten, &mut files_removed) {
            warn!(movie = %removed.name, error = %e, "Delete failed, restoring record");
            self.movies.insert(index, removed);
            return Err(e.into());
        }

        let warning = if files_rewritten.is_empty() && files_removed.is_empty() {
            let message = format!(
                "'{}' was removed from the catalog but was not found in any bucket file",
                removed.name
            );
            warn!(movie = %removed.name, "Deleted movie was not found in any bucket file");
            Some(message)
        } else {
            None
        };

        let pruned = prune_empty(self.store.as_ref(), &self.resolver);
        info!(movie = %removed.name, "Movie deleted");
        Ok(DeleteOutcome {
            removed,
            files_rewritten,
            files_removed,
            warning,
            pruned,
        })
    }

    /// Prune empty buckets and directories under the catalog root.
    pub fn prune_empty(&self) -> PruneReport {
        prune_empty(self.store.as_ref(), &self.resolver)
    }

    fn position(&self, movie: &Movie) -> Option<usize> {
        self.movies.iter().position(|m| identical(m, movie))
    }

    /// Rewrite every bucket file so `original` lives only in `target` as `updated`.
    /// Returns whether `original` was present on disk. Unreadable files other
    /// than the target are skipped.
    fn relocate(
        &self,
        original: &Movie,
        updated: &Movie,
        target: &BucketKey,
    ) -> Result<bool, StorageError> {
        let target_file = self.resolver.bucket_file(target);
        let mut target_seen = false;
        let mut found = false;

        // Collected up front so removals do not disturb the walk.
        let files: Vec<PathBuf> = discover_bucket_files(&self.resolver).collect();
        for path in files {
            let is_target = path == target_file;
            let rows = match self.store.read(&path) {
                Ok(rows) => rows,
                Err(e) if is_target => return Err(e),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable bucket file");
                    continue;
                }
            };
            let mut kept = Vec::with_capacity(rows.len() + 1);
            let mut had_original = false;
            for row in rows {
                if !identical(&row, original) {
                    kept.push(row);
                } else if is_target && !had_original {
                    kept.push(updated.clone());
                    had_original = true;
                } else {
                    had_original = true;
                }
            }
            found |= had_original;

            if is_target {
                target_seen = true;
                if !had_original {
                    kept.push(updated.clone());
                }
                self.store.write(&path, &kept)?;
            } else if had_original {
                if kept.is_empty() {
                    fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
                } else {
                    self.store.write(&path, &kept)?;
                }
            }
        }

        if !target_seen {
            let dir = self.resolver.bucket_dir(target);
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
            self.store.write(&target_file, std::slice::from_ref(updated))?;
        }
        Ok(found)
    }

    fn remove_from_files(
        &self,
        movie: &Movie,
        rewritten: &mut Vec<PathBuf>,
        removed: &mut Vec<PathBuf>,
    ) -> Result<(), StorageError> {
        let files: Vec<PathBuf> = discover_bucket_files(&self.resolver).collect();
        for path in files {
            let rows = match self.store.read(&path) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable bucket file");
                    continue;
                }
            };
            let before = rows.len();
            let kept: Vec<Movie> = rows.into_iter().filter(|m| !identical(m, movie)).collect();
            if kept.len() == before {
                continue;
            }
            if kept.is_empty() {
                fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
                removed.push(path);
            } else {
                self.store.write(&path, &kept)?;
                rewritten.push(path);
            }
        }
        Ok(())
    }
}
