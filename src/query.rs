//! Read-only views over the catalog: counts, averages, sorting and filters.

use crate::bucket::{BucketKey, BucketResolver};
use crate::error::CatalogError;
use crate::movie::{validate, Attribute, Genre, Language, Movie, MAX_RATING};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::PathBuf;

/// Average duration for one genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreAverage {
    pub genre: String,
    pub average_minutes: f64,
    pub movies: usize,
}

pub fn count(movies: &[Movie]) -> usize {
    movies.len()
}

/// Movies per genre for every known genre, zeros included, in canonical order.
pub fn count_by_genre(movies: &[Movie]) -> Vec<(Genre, usize)> {
    Genre::ALL
        .iter()
        .map(|genre| {
            let n = movies
                .iter()
                .filter(|m| m.genre.trim() == genre.as_str())
                .count();
            (*genre, n)
        })
        .collect()
}

/// Mean duration in minutes. Rows with a non-integer duration are skipped.
pub fn average_duration(movies: &[Movie]) -> Option<f64> {
    let durations: Vec<u64> = movies.iter().filter_map(duration_of).collect();
    if durations.is_empty() {
        return None;
    }
    Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
}

/// Mean duration per genre, for genres that have movies, in first-seen order.
pub fn average_duration_by_genre(movies: &[Movie]) -> Vec<GenreAverage> {
    let mut totals: Vec<(String, u64, usize)> = Vec::new();
    for movie in movies {
        let Some(duration) = duration_of(movie) else {
            continue;
        };
        let genre = movie.genre.trim();
        match totals.iter_mut().find(|(g, _, _)| g == genre) {
            Some(entry) => {
                entry.1 += duration;
                entry.2 += 1;
            }
            None => totals.push((genre.to_string(), duration, 1)),
        }
    }
    totals
        .into_iter()
        .map(|(genre, total, n)| GenreAverage {
            genre,
            average_minutes: total as f64 / n as f64,
            movies: n,
        })
        .collect()
}

fn duration_of(movie: &Movie) -> Option<u64> {
    movie.duration.trim().parse().ok()
}

/// Stable sort by one attribute.
///
/// Year and duration compare as integers and rating as a decimal; other
/// attributes compare as text. Values that do not parse sort after those that do.
pub fn sort_by(movies: &[Movie], attribute: Attribute, descending: bool) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, attribute);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}

fn compare(a: &Movie, b: &Movie, attribute: Attribute) -> Ordering {
    let (x, y) = (a.get(attribute).trim(), b.get(attribute).trim());
    match attribute {
        Attribute::Year | Attribute::Duration | Attribute::Rating => {
            match (x.parse::<f64>().ok(), y.parse::<f64>().ok()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => x.cmp(y),
            }
        }
        _ => x.cmp(y),
    }
}

/// A single filter criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieFilter {
    Genre(Genre),
    YearRange { min: u32, max: u32 },
    DurationRange { min: u32, max: u32 },
    RatingRange { min: f32, max: f32 },
    /// Case-insensitive substring of the director's name, stored lowercased.
    /// Build with [`MovieFilter::director`].
    Director(String),
    Language(Language),
}

impl MovieFilter {
    pub fn year_range(a: u32, b: u32) -> Self {
        let (min, max) = ordered(a, b);
        MovieFilter::YearRange { min, max }
    }

    pub fn duration_range(a: u32, b: u32) -> Self {
        let (min, max) = ordered(a, b);
        MovieFilter::DurationRange { min, max }
    }

    /// Both bounds must lie within the rating scale.
    pub fn rating_range(a: f32, b: f32) -> Result<Self, CatalogError> {
        for bound in [a, b] {
            if !(0.0..=MAX_RATING).contains(&bound) {
                return Err(CatalogError::InvalidInput(format!(
                    "Rating bound {} is outside 0-{}",
                    bound, MAX_RATING
                )));
            }
        }
        let (min, max) = if a > b { (b, a) } else { (a, b) };
        Ok(MovieFilter::RatingRange { min, max })
    }

    pub fn director(fragment: &str) -> Self {
        MovieFilter::Director(fragment.trim().to_lowercase())
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            MovieFilter::Genre(genre) => movie.genre.trim() == genre.as_str(),
            MovieFilter::YearRange { min, max } => movie
                .year
                .trim()
                .parse::<u32>()
                .is_ok_and(|y| (*min..=*max).contains(&y)),
            MovieFilter::DurationRange { min, max } => movie
                .duration
                .trim()
                .parse::<u32>()
                .is_ok_and(|d| (*min..=*max).contains(&d)),
            MovieFilter::RatingRange { min, max } => movie
                .rating
                .trim()
                .parse::<f32>()
                .is_ok_and(|r| (*min..=*max).contains(&r)),
            MovieFilter::Director(fragment) => {
                movie.director.to_lowercase().contains(fragment.as_str())
            }
            MovieFilter::Language(language) => movie.language.trim() == language.as_str(),
        }
    }

    pub fn apply(&self, movies: &[Movie]) -> Vec<Movie> {
        movies.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Bucket directory a movie belongs in, or `None` if it does not validate.
pub fn location_of(resolver: &BucketResolver, movie: &Movie) -> Option<PathBuf> {
    let checked = validate(&movie.normalized()).ok()?;
    Some(resolver.bucket_dir(&BucketKey::from(&checked)))
}
