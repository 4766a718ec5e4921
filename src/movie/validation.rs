//! Field validation for movie records.

use super::catalog_values::{Genre, Language};
use super::duration::{classify_duration, DurationClass};
use super::record::{Attribute, Movie};
use thiserror::Error;

/// Highest accepted rating.
pub const MAX_RATING: f32 = 10.0;

/// First rule a record violates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{0}' cannot be empty")]
    EmptyField(Attribute),

    #[error("Invalid genre '{0}'. Must be one of: {}", Genre::joined())]
    InvalidGenre(String),

    #[error("Year must be a valid integer")]
    YearNotInteger,

    #[error("Year must be a positive integer")]
    YearNotPositive,

    #[error("Duration must be a valid integer")]
    DurationNotInteger,

    #[error("Duration must be a positive integer")]
    DurationNotPositive,

    #[error("Rating must be a valid number")]
    RatingNotNumber,

    #[error("Rating cannot be negative")]
    RatingNegative,

    #[error("Rating cannot be greater than {}", MAX_RATING)]
    RatingAboveMax,

    #[error("Rating can have maximum 1 decimal place")]
    RatingTooPrecise,

    #[error("Invalid language '{0}'. Must be one of: {}", Language::joined())]
    InvalidLanguage(String),
}

/// Typed view of a record that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedMovie {
    pub genre: Genre,
    pub year: u32,
    pub duration: u32,
    pub rating: f32,
    pub language: Language,
}

impl ValidatedMovie {
    pub fn duration_class(&self) -> DurationClass {
        classify_duration(self.duration)
    }
}

/// Validate a record, reporting the first violation.
///
/// Order: emptiness, genre, year, duration, rating, language.
pub fn validate(movie: &Movie) -> Result<ValidatedMovie, ValidationError> {
    if let Some(attribute) = movie.first_empty_field() {
        return Err(ValidationError::EmptyField(attribute));
    }

    let genre_text = movie.genre.trim();
    let genre: Genre = genre_text
        .parse()
        .map_err(|_| ValidationError::InvalidGenre(genre_text.to_string()))?;

    let year = parse_positive(
        &movie.year,
        ValidationError::YearNotInteger,
        ValidationError::YearNotPositive,
    )?;
    let duration = parse_positive(
        &movie.duration,
        ValidationError::DurationNotInteger,
        ValidationError::DurationNotPositive,
    )?;
    let rating = parse_rating(&movie.rating)?;

    let language_text = movie.language.trim();
    let language: Language = language_text
        .parse()
        .map_err(|_| ValidationError::InvalidLanguage(language_text.to_string()))?;

    Ok(ValidatedMovie {
        genre,
        year,
        duration,
        rating,
        language,
    })
}

fn parse_positive(
    raw: &str,
    not_integer: ValidationError,
    not_positive: ValidationError,
) -> Result<u32, ValidationError> {
    let value: i64 = raw.trim().parse().map_err(|_| not_integer.clone())?;
    if value <= 0 {
        return Err(not_positive);
    }
    u32::try_from(value).map_err(|_| not_integer)
}

fn parse_rating(raw: &str) -> Result<f32, ValidationError> {
    let text = raw.trim();
    let rating: f32 = text.parse().map_err(|_| ValidationError::RatingNotNumber)?;
    if !rating.is_finite() {
        return Err(ValidationError::RatingNotNumber);
    }
    if rating < 0.0 {
        return Err(ValidationError::RatingNegative);
    }
    if rating > MAX_RATING {
        return Err(ValidationError::RatingAboveMax);
    }
    if let Some((_, fraction)) = text.split_once('.') {
        if fraction.len() > 1 {
            return Err(ValidationError::RatingTooPrecise);
        }
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Movie {
        Movie::new(
            "Arrival",
            "Science Fiction",
            "2016",
            "116",
            "7.9",
            "Denis Villeneuve",
            "English",
        )
    }

    #[test]
    fn test_valid_movie() {
        let checked = validate(&valid()).unwrap();
        assert_eq!(checked.genre, Genre::ScienceFiction);
        assert_eq!(checked.year, 2016);
        assert_eq!(checked.duration_class(), DurationClass::Medium);
        assert_eq!(checked.language, Language::English);
    }

    #[test]
    fn test_empty_field_reported_first() {
        let mut movie = valid();
        movie.genre = "Sci-Fi".to_string();
        movie.director = String::new();
        assert_eq!(
            validate(&movie),
            Err(ValidationError::EmptyField(Attribute::Director))
        );
    }

    #[test]
    fn test_genre_checked_before_year() {
        let mut movie = valid();
        movie.genre = "Sci-Fi".to_string();
        movie.year = "abc".to_string();
        assert_eq!(
            validate(&movie),
            Err(ValidationError::InvalidGenre("Sci-Fi".to_string()))
        );
    }

    #[test]
    fn test_year_and_duration_rules() {
        let mut movie = valid();
        movie.year = "19x5".to_string();
        assert_eq!(validate(&movie), Err(ValidationError::YearNotInteger));
        movie.year = "0".to_string();
        assert_eq!(validate(&movie), Err(ValidationError::YearNotPositive));
        movie.year = "2016".to_string();
        movie.duration = "-5".to_string();
        assert_eq!(validate(&movie), Err(ValidationError::DurationNotPositive));
        movie.duration = "1.5".to_string();
        assert_eq!(validate(&movie), Err(ValidationError::DurationNotInteger));
    }

    #[test]
    fn test_rating_rules() {
        let mut movie = valid();
        for (raw, expected) in [
            ("high", Err(ValidationError::RatingNotNumber)),
            ("-1", Err(ValidationError::RatingNegative)),
            ("10.5", Err(ValidationError::RatingAboveMax)),
            ("7.25", Err(ValidationError::RatingTooPrecise)),
            ("NaN", Err(ValidationError::RatingNotNumber)),
        ] {
            movie.rating = raw.to_string();
            assert_eq!(validate(&movie).map(|v| v.rating), expected, "{raw}");
        }
        for raw in ["0", "10", "7", "7.5", " 8.0 "] {
            movie.rating = raw.to_string();
            assert!(validate(&movie).is_ok(), "{raw} should be accepted");
        }
    }

    #[test]
    fn test_language_checked_last() {
        let mut movie = valid();
        movie.language = "english".to_string();
        assert_eq!(
            validate(&movie),
            Err(ValidationError::InvalidLanguage("english".to_string()))
        );
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = ValidationError::EmptyField(Attribute::Director);
        assert_eq!(err.to_string(), "Field 'director' cannot be empty");
        let err = ValidationError::InvalidGenre("Sci-Fi".to_string());
        assert!(err.to_string().contains("Science Fiction"));
    }
}
