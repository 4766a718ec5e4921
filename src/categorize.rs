//! Categorization Engine
//!
//! Moves valid, non-duplicate movies from the staging file into their buckets.
//! The staging file is then rewritten to hold only what was left behind:
//! invalid rows first, then duplicates.

use crate::bucket::{BucketKey, BucketResolver};
use crate::error::{CatalogError, StorageError};
use crate::movie::{identical, validate, Movie};
use crate::store::{MalformedRow, MovieStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Counters for one categorization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizationStats {
    pub total_categories: usize,
    pub total_movies_processed: usize,
    /// Incremented every time a bucket directory is ensured, new or not.
    pub created_folders: usize,
    pub created_files: usize,
    pub validation_errors: usize,
    pub duplicate_movies_skipped: usize,
}

/// A staging row that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedMovie {
    pub movie: Movie,
    pub reason: String,
}

/// Where the matching copy of a duplicate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Already stored in the bucket file.
    Stored,
    /// Appeared earlier in the same staging batch.
    SameBatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedDuplicate {
    pub movie: Movie,
    pub bucket: BucketKey,
    pub kind: DuplicateKind,
}

/// Full result of a categorization pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizationReport {
    pub stats: CategorizationStats,
    pub invalid: Vec<RejectedMovie>,
    pub duplicates: Vec<SkippedDuplicate>,
    /// Rows of buckets that could not be written; kept in staging for the next run.
    pub deferred: Vec<Movie>,
}

impl CategorizationReport {
    /// Rows the staging file holds after the pass, in order.
    pub fn leftovers(&self) -> Vec<Movie> {
        self.invalid
            .iter()
            .map(|r| r.movie.clone())
            .chain(self.duplicates.iter().map(|d| d.movie.clone()))
            .chain(self.deferred.iter().cloned())
            .collect()
    }
}

/// Incoming staging row: as read, and normalized for storage and comparison.
struct Incoming {
    raw: Movie,
    movie: Movie,
}

struct GroupOutcome {
    accepted: usize,
    duplicates: Vec<SkippedDuplicate>,
}

/// Staging-to-bucket categorization.
pub struct CategorizationEngine {
    resolver: BucketResolver,
    store: Arc<dyn MovieStore>,
    staging_file: PathBuf,
}

impl CategorizationEngine {
    pub fn new(
        resolver: BucketResolver,
        store: Arc<dyn MovieStore>,
        staging_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            store,
            staging_file: staging_file.into(),
        }
    }

    pub fn staging_file(&self) -> &Path {
        &self.staging_file
    }

    /// Run one pass over the staging file.
    ///
    /// A missing staging file aborts the pass. Rows that cannot be decoded are
    /// treated as invalid and kept in staging. Failures on a single bucket are
    /// logged and that bucket's rows stay in staging. A failure rewriting the
    /// staging file is returned after the buckets were already written; the
    /// next pass re-deduplicates those rows harmlessly.
    pub fn categorize(&self) -> Result<CategorizationReport, CatalogError> {
        let rows = self
            .store
            .read_rows(&self.staging_file)
            .map_err(|e| match e {
                StorageError::NotFound(path) => CatalogError::StagingNotFound(path),
                other => CatalogError::from(other),
            })?;
        info!(
            path = %self.staging_file.display(),
            rows = rows.len(),
            "Categorizing staging file"
        );

        let mut report = CategorizationReport::default();
        let groups = self.group_valid(rows, &mut report);

        for (key, incoming) in groups {
            match self.file_group(&key, &incoming, &mut report.stats) {
                Ok(outcome) => {
                    report.stats.total_categories += 1;
                    report.stats.created_files += 1;
                    report.stats.total_movies_processed += outcome.accepted;
                    report.stats.duplicate_movies_skipped += outcome.duplicates.len();
                    report.duplicates.extend(outcome.duplicates);
                }
                Err(e) => {
                    warn!(bucket = %key, error = %e, "Failed to write bucket, keeping rows in staging");
                    report.deferred.extend(incoming.into_iter().map(|i| i.raw));
                }
            }
        }

        self.store.write(&self.staging_file, &report.leftovers())?;
        info!(
            processed = report.stats.total_movies_processed,
            invalid = report.stats.validation_errors,
            duplicates = report.stats.duplicate_movies_skipped,
            "Categorization finished"
        );
        Ok(report)
    }

    /// Validate rows and group the valid ones by bucket, in first-seen order.
    fn group_valid(
        &self,
        rows: Vec<Result<Movie, MalformedRow>>,
        report: &mut CategorizationReport,
    ) -> Vec<(BucketKey, Vec<Incoming>)> {
        let mut groups: Vec<(BucketKey, Vec<Incoming>)> = Vec::new();
        let mut index: HashMap<BucketKey, usize> = HashMap::new();

        for row in rows {
            let raw = match row {
                Ok(raw) => raw,
                Err(malformed) => {
                    report.stats.validation_errors += 1;
                    report.invalid.push(RejectedMovie {
                        movie: malformed.movie,
                        reason: malformed.reason,
                    });
                    continue;
                }
            };
            let movie = raw.normalized();
            let checked = match validate(&movie) {
                Ok(checked) => checked,
                Err(e) => {
                    warn!(movie = %movie.name, reason = %e, "Invalid staging row");
                    report.stats.validation_errors += 1;
                    report.invalid.push(RejectedMovie {
                        movie: raw,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let key = BucketKey::from(&checked);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(Incoming { raw, movie });
        }
        groups
    }

    /// Merge one group into its bucket file.
    fn file_group(
        &self,
        key: &BucketKey,
        incoming: &[Incoming],
        stats: &mut CategorizationStats,
    ) -> Result<GroupOutcome, StorageError> {
        let dir = self.resolver.bucket_dir(key);
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        stats.created_folders += 1;

        let file = self.resolver.bucket_file(key);
        let mut stored = self.store.read(&file)?;
        let existing_len = stored.len();
        let mut duplicates = Vec::new();

        for item in incoming {
            let kind = if stored[..existing_len]
                .iter()
                .any(|e| identical(e, &item.movie))
            {
                Some(DuplicateKind::Stored)
            } else if stored[existing_len..]
                .iter()
                .any(|e| identical(e, &item.movie))
            {
                Some(DuplicateKind::SameBatch)
            } else {
                None
            };

            match kind {
                Some(kind) => {
                    info!(movie = %item.movie.name, bucket = %key, ?kind, "Duplicate skipped");
                    duplicates.push(SkippedDuplicate {
                        movie: item.raw.clone(),
                        bucket: *key,
                        kind,
                    });
                }
                None => stored.push(item.movie.clone()),
            }
        }

        self.store.write(&file, &stored)?;
        Ok(GroupOutcome {
            accepted: stored.len() - existing_len,
            duplicates,
        })
    }
}
