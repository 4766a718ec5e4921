//! Text rendering for command output.

use crate::bucket::BucketResolver;
use crate::catalog::{DeleteOutcome, PruneReport, UpdateOutcome};
use crate::categorize::CategorizationReport;
use crate::error::CatalogError;
use crate::layout::{LayoutReport, StagingAction};
use crate::movie::{Movie, HEADER};
use crate::query;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, CatalogError> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CatalogError::InvalidInput(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CatalogError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CatalogError::InvalidInput(format!("Failed to serialize output: {}", e)))
}

/// Movies as a table. With a resolver, a location column is added.
pub fn format_movies_table(movies: &[Movie], resolver: Option<&BucketResolver>) -> String {
    if movies.is_empty() {
        return "No movies to display".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    let mut header: Vec<&str> = HEADER.to_vec();
    if resolver.is_some() {
        header.push("location");
    }
    table.set_header(header);

    for movie in movies {
        let mut row: Vec<String> = movie.fields().iter().map(|f| f.to_string()).collect();
        if let Some(resolver) = resolver {
            let location = query::location_of(resolver, movie)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push(location);
        }
        table.add_row(row);
    }
    format!("{}", table)
}

pub fn format_count_text(movies: &[Movie]) -> String {
    format!("Total number of movies: {}", query::count(movies))
}

pub fn format_count_by_genre_text(movies: &[Movie]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Genre", "Movies"]);
    for (genre, n) in query::count_by_genre(movies) {
        table.add_row(vec![genre.to_string(), n.to_string()]);
    }
    format!("{}", table)
}

pub fn format_average_text(movies: &[Movie]) -> String {
    match query::average_duration(movies) {
        Some(avg) => format!("Average duration of all movies: {:.2} minutes", avg),
        None => "No movies to calculate average duration".to_string(),
    }
}

pub fn format_average_by_genre_text(movies: &[Movie]) -> String {
    let averages = query::average_duration_by_genre(movies);
    if averages.is_empty() {
        return "No movies to calculate average duration by genre".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Genre", "Movies", "Average (min)"]);
    for entry in averages {
        table.add_row(vec![
            entry.genre,
            entry.movies.to_string(),
            format!("{:.2}", entry.average_minutes),
        ]);
    }
    format!("{}", table)
}

/// Count, per-genre counts and duration averages in one report.
pub fn format_stats_text(movies: &[Movie]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Catalog")));
    out.push_str(&format!("  {}\n", format_count_text(movies)));
    out.push_str(&format!("  {}\n\n", format_average_text(movies)));
    out.push_str(&format!("{}\n\n", format_section_heading("Movies by genre")));
    out.push_str(&format!("{}\n\n", format_count_by_genre_text(movies)));
    out.push_str(&format!("{}\n\n", format_section_heading("Average duration by genre")));
    out.push_str(&format_average_by_genre_text(movies));
    out
}

#[derive(Serialize)]
pub struct StatsOutput {
    pub total: usize,
    pub by_genre: Vec<GenreCountOutput>,
    pub average_duration: Option<f64>,
    pub average_duration_by_genre: Vec<query::GenreAverage>,
}

#[derive(Serialize)]
pub struct GenreCountOutput {
    pub genre: String,
    pub movies: usize,
}

impl StatsOutput {
    pub fn from_movies(movies: &[Movie]) -> Self {
        Self {
            total: query::count(movies),
            by_genre: query::count_by_genre(movies)
                .into_iter()
                .map(|(genre, movies)| GenreCountOutput {
                    genre: genre.to_string(),
                    movies,
                })
                .collect(),
            average_duration: query::average_duration(movies),
            average_duration_by_genre: query::average_duration_by_genre(movies),
        }
    }
}

pub fn format_categorization_text(report: &CategorizationReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Categorization")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Counter", "Value"]);
    for (name, value) in [
        ("Categories", stats.total_categories),
        ("Movies processed", stats.total_movies_processed),
        ("Folders ensured", stats.created_folders),
        ("Files written", stats.created_files),
        ("Validation errors", stats.validation_errors),
        ("Duplicates skipped", stats.duplicate_movies_skipped),
    ] {
        table.add_row(vec![name.to_string(), value.to_string()]);
    }
    out.push_str(&format!("{}\n", table));

    if !report.invalid.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Left in staging (invalid)")));
        for rejected in &report.invalid {
            out.push_str(&format!("  {}: {}\n", rejected.movie.name, rejected.reason));
        }
    }
    if !report.duplicates.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Left in staging (duplicates)")));
        for duplicate in &report.duplicates {
            out.push_str(&format!("  {} ({})\n", duplicate.movie.name, duplicate.bucket));
        }
    }
    if !report.deferred.is_empty() {
        out.push_str(&format!(
            "\n{} rows kept in staging after bucket write failures\n",
            report.deferred.len()
        ));
    }
    out
}

pub fn format_layout_text(report: &LayoutReport) -> String {
    let mut out = String::new();
    let root_state = if report.root_created { "created" } else { "present" };
    out.push_str(&format!("Catalog root ({}): {}\n", root_state, report.root.display()));
    let staging = match &report.staging {
        StagingAction::Present => "present".to_string(),
        StagingAction::Created => "created".to_string(),
        StagingAction::Moved { from } => format!("moved from {}", from.display()),
    };
    out.push_str(&format!(
        "Staging file ({}): {}",
        staging,
        report.staging_file.display()
    ));
    out
}

pub fn format_prune_text(report: &PruneReport) -> String {
    if report.is_empty() {
        return "Nothing to prune".to_string();
    }
    let mut out = format!(
        "Removed {} empty files and {} empty directories",
        report.removed_files.len(),
        report.removed_dirs.len()
    );
    for path in report.removed_files.iter().chain(report.removed_dirs.iter()) {
        out.push_str(&format!("\n  {}", path.display()));
    }
    out
}

pub fn format_update_text(outcome: &UpdateOutcome) -> String {
    let mut out = format!("Updated '{}' (now in {})", outcome.updated.name, outcome.bucket);
    if !outcome.found_on_disk {
        out.push_str("\nWarning: the original record was not found in any bucket file");
    }
    out
}

pub fn format_delete_text(outcome: &DeleteOutcome) -> String {
    let mut out = format!("Deleted '{}'", outcome.removed.name);
    if let Some(warning) = &outcome.warning {
        out.push_str(&format!("\nWarning: {}", warning));
    }
    out
}
