//! Interactive numbered menu over a loaded catalog.
//!
//! Bad input is reported and prompted for again. Only a failure to read from
//! the terminal ends the session with an error.

use crate::catalog::MovieCatalog;
use crate::error::CatalogError;
use crate::movie::{Attribute, DurationClass, Genre, Language, Movie, MAX_RATING};
use crate::query::{self, MovieFilter};
use crate::tooling::format::{
    format_average_by_genre_text, format_average_text, format_count_by_genre_text,
    format_count_text, format_delete_text, format_movies_table, format_section_heading,
    format_update_text,
};
use dialoguer::{Confirm, Input};

const MAIN_MENU: [&str; 10] = [
    "Show all movies with path",
    "Show total number of movies",
    "Show total number of movies by genre",
    "Show average duration of all movies",
    "Show average duration of all movies by genre",
    "Show movies sorted by attribute",
    "Show movies filtered by attribute",
    "Add new movie",
    "Update movie",
    "Delete movie",
];

const FILTER_MENU: [&str; 6] = [
    "Genre",
    "Release year range",
    "Duration range in minutes",
    "Rating range",
    "Director",
    "Original language",
];

/// Parse a menu choice and check it lies in `min..=max`.
pub fn parse_bounded_option(input: &str, min: u32, max: u32) -> Result<u32, CatalogError> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| CatalogError::InvalidInput(format!("'{}' is not a whole number", input.trim())))?;
    if !(min..=max).contains(&value) {
        return Err(CatalogError::InvalidInput(format!(
            "Option must be between {} and {}",
            min, max
        )));
    }
    Ok(value)
}

/// Parse a rating bound on the 0-10 scale.
pub fn parse_rating_bound(input: &str) -> Result<f32, CatalogError> {
    let value: f32 = input
        .trim()
        .parse()
        .map_err(|_| CatalogError::InvalidInput(format!("'{}' is not a number", input.trim())))?;
    if !(0.0..=MAX_RATING).contains(&value) {
        return Err(CatalogError::InvalidInput(format!(
            "Rating must be between 0 and {}",
            MAX_RATING
        )));
    }
    Ok(value)
}

fn numbered(title: &str, items: &[&str], back_label: &str) -> String {
    let mut out = format!("\n{}\n", format_section_heading(title));
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
    out.push_str(&format!("0. {}", back_label));
    out
}

fn read_line(prompt: &str) -> Result<String, CatalogError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CatalogError::InvalidInput(format!("Failed to get user input: {}", e)))
}

/// Prompt until `parse` accepts the line.
fn prompt_until<T>(
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, CatalogError>,
) -> Result<T, CatalogError> {
    loop {
        let line = read_line(prompt)?;
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(e) => println!("Invalid option: {}", e),
        }
    }
}

fn prompt_option(prompt: &str, max: u32) -> Result<u32, CatalogError> {
    prompt_until(prompt, |line| parse_bounded_option(line, 0, max))
}

/// Interactive session owning the catalog for its lifetime.
pub struct Menu {
    catalog: MovieCatalog,
}

impl Menu {
    pub fn new(catalog: MovieCatalog) -> Self {
        Self { catalog }
    }

    pub fn run(&mut self) -> Result<(), CatalogError> {
        loop {
            println!("{}", numbered("Main Menu", &MAIN_MENU, "Exit"));
            let option = prompt_option("Enter option", MAIN_MENU.len() as u32)?;
            let movies = self.catalog.movies();
            let output = match option {
                0 => {
                    println!("\nExiting...");
                    return Ok(());
                }
                1 => format_movies_table(movies, Some(self.catalog.resolver())),
                2 => format_count_text(movies),
                3 => format_count_by_genre_text(movies),
                4 => format_average_text(movies),
                5 => format_average_by_genre_text(movies),
                6 => self.sorted()?,
                7 => self.filtered()?,
                8 => self.add()?,
                9 => self.update()?,
                _ => self.delete()?,
            };
            println!("\n{}", output);
        }
    }

    fn sorted(&self) -> Result<String, CatalogError> {
        let names: Vec<&str> = Attribute::ALL.iter().map(|a| a.as_str()).collect();
        println!("{}", numbered("Choose attribute to sort movies", &names, "Return to main menu"));
        let option = prompt_option("Enter option", names.len() as u32)?;
        if option == 0 {
            return Ok(String::new());
        }
        let attribute = Attribute::ALL[option as usize - 1];
        let descending = Confirm::new()
            .with_prompt("Descending order?")
            .default(false)
            .interact()
            .map_err(|e| CatalogError::InvalidInput(format!("Failed to get user input: {}", e)))?;
        let sorted = query::sort_by(self.catalog.movies(), attribute, descending);
        Ok(format!(
            "Movies sorted by {}\n{}",
            attribute,
            format_movies_table(&sorted, None)
        ))
    }

    fn filtered(&self) -> Result<String, CatalogError> {
        println!("{}", numbered("Choose attribute to filter movies", &FILTER_MENU, "Return to main menu"));
        let filter = match prompt_option("Enter option", FILTER_MENU.len() as u32)? {
            0 => return Ok(String::new()),
            1 => match choose_genre()? {
                Some(genre) => MovieFilter::Genre(genre),
                None => return Ok(String::new()),
            },
            2 => {
                let min = prompt_until("Minimum year", |l| parse_bounded_option(l, 0, u32::MAX))?;
                let max = prompt_until("Maximum year", |l| parse_bounded_option(l, 0, u32::MAX))?;
                MovieFilter::year_range(min, max)
            }
            3 => {
                let min = prompt_until("Minimum duration (minutes)", |l| {
                    parse_bounded_option(l, 0, u32::MAX)
                })?;
                let max = prompt_until("Maximum duration (minutes)", |l| {
                    parse_bounded_option(l, 0, u32::MAX)
                })?;
                MovieFilter::duration_range(min, max)
            }
            4 => {
                let min = prompt_until("Minimum rating (0 to 10)", parse_rating_bound)?;
                let max = prompt_until("Maximum rating (0 to 10)", parse_rating_bound)?;
                MovieFilter::rating_range(min, max)?
            }
            5 => {
                let fragment = prompt_until("Director name", |l| non_empty(l, "a director name"))?;
                MovieFilter::director(&fragment)
            }
            _ => match choose_language()? {
                Some(language) => MovieFilter::Language(language),
                None => return Ok(String::new()),
            },
        };
        let matches = filter.apply(self.catalog.movies());
        if matches.is_empty() {
            return Ok("No movies match the filter criteria".to_string());
        }
        Ok(format_movies_table(&matches, None))
    }

    fn add(&mut self) -> Result<String, CatalogError> {
        println!("\n{}", format_section_heading("Add new movie"));
        println!("Genres: {}", Genre::joined());
        println!("Languages: {}", Language::joined());
        let mut movie = Movie::default();
        for attribute in Attribute::ALL {
            let value = read_line(&capitalize(attribute.as_str()))?;
            movie.set(attribute, value);
        }
        Ok(match self.catalog.add(movie) {
            Ok(key) => format!("Movie added to {}", key),
            Err(e) => format!("Error: {}", e),
        })
    }

    fn update(&mut self) -> Result<String, CatalogError> {
        println!("\n{}", format_section_heading("Update movie"));
        let Some(movie) = self.select_movie()? else {
            return Ok("Movie not found".to_string());
        };
        let names: Vec<&str> = Attribute::ALL.iter().map(|a| a.as_str()).collect();
        println!("{}", numbered("Choose attribute to update", &names, "Cancel"));
        let option = prompt_option("Enter option", names.len() as u32)?;
        if option == 0 {
            return Ok("Update cancelled".to_string());
        }
        let attribute = Attribute::ALL[option as usize - 1];
        let value = read_line(&format!("New {}", attribute))?;
        Ok(match self.catalog.update(&movie, attribute, &value) {
            Ok(outcome) => format_update_text(&outcome),
            Err(e) => format!("Error: {}", e),
        })
    }

    fn delete(&mut self) -> Result<String, CatalogError> {
        println!("\n{}", format_section_heading("Delete movie"));
        let Some(movie) = self.select_movie()? else {
            return Ok("Movie not found".to_string());
        };
        println!("{}", movie);
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}'?", movie.name))
            .default(false)
            .interact()
            .map_err(|e| CatalogError::InvalidInput(format!("Failed to get user input: {}", e)))?;
        if !confirmed {
            return Ok("Deletion cancelled".to_string());
        }
        Ok(match self.catalog.delete(&movie) {
            Ok(outcome) => format_delete_text(&outcome),
            Err(e) => format!("Error: {}", e),
        })
    }

    /// Ask for name, genre, year and duration class and look the movie up.
    fn select_movie(&self) -> Result<Option<Movie>, CatalogError> {
        let name = prompt_until("Name", |l| non_empty(l, "a name"))?;
        let Some(genre) = choose_genre()? else {
            return Ok(None);
        };
        let year = prompt_until("Release year", |l| parse_bounded_option(l, 1, u32::MAX))?;
        let classes: Vec<&str> = DurationClass::ALL.iter().map(|c| c.as_str()).collect();
        println!("{}", numbered("Duration class", &classes, "Cancel"));
        let option = prompt_option("Enter option", classes.len() as u32)?;
        if option == 0 {
            return Ok(None);
        }
        let class = DurationClass::ALL[option as usize - 1];
        Ok(self
            .catalog
            .find_by_criteria(&name, genre, year, class)
            .cloned())
    }
}

fn choose_genre() -> Result<Option<Genre>, CatalogError> {
    let names: Vec<&str> = Genre::ALL.iter().map(|g| g.as_str()).collect();
    println!("{}", numbered("Choose genre", &names, "Return to main menu"));
    let option = prompt_option("Enter option", names.len() as u32)?;
    Ok((option > 0).then(|| Genre::ALL[option as usize - 1]))
}

fn choose_language() -> Result<Option<Language>, CatalogError> {
    let names: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
    println!("{}", numbered("Choose language", &names, "Return to main menu"));
    let option = prompt_option("Enter option", names.len() as u32)?;
    Ok((option > 0).then(|| Language::ALL[option as usize - 1]))
}

fn non_empty(line: &str, what: &str) -> Result<String, CatalogError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidInput(format!("You must enter {}", what)));
    }
    Ok(trimmed.to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounded_option() {
        assert_eq!(parse_bounded_option(" 3 ", 0, 10).unwrap(), 3);
        assert_eq!(parse_bounded_option("0", 0, 10).unwrap(), 0);
        assert!(parse_bounded_option("11", 0, 10).is_err());
        assert!(parse_bounded_option("-1", 0, 10).is_err());
        assert!(parse_bounded_option("two", 0, 10).is_err());
        assert!(parse_bounded_option("", 0, 10).is_err());
    }

    #[test]
    fn test_parse_rating_bound() {
        assert_eq!(parse_rating_bound("7.5").unwrap(), 7.5);
        assert!(parse_rating_bound("10.1").is_err());
        assert!(parse_rating_bound("-0.5").is_err());
    }

    #[test]
    fn test_numbered_menu_lists_every_option() {
        let text = numbered("Main Menu", &MAIN_MENU, "Exit");
        assert!(text.contains("10. Delete movie"));
        assert!(text.ends_with("0. Exit"));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  Nolan ", "x").unwrap(), "Nolan");
        assert!(non_empty("   ", "x").is_err());
        assert_eq!(capitalize("duration"), "Duration");
    }
}
