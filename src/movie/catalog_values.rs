//! Closed value sets for genre and language.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Movie genre. Matching against text is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Thriller,
    War,
    Western,
}

impl Genre {
    pub const ALL: [Genre; 16] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Comma-separated list of every genre, for error messages and prompts.
    pub fn joined() -> String {
        Self::ALL
            .iter()
            .map(Genre::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid genre '{}'. Must be one of: {}", s, Self::joined()))
    }
}

/// Original language of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    German,
    Italian,
    French,
    Portuguese,
    Russian,
    Korean,
    Chinese,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::French,
        Language::Portuguese,
        Language::Russian,
        Language::Korean,
        Language::Chinese,
        Language::Japanese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::French => "French",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
        }
    }

    pub fn joined() -> String {
        Self::ALL
            .iter()
            .map(Language::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid language '{}'. Must be one of: {}",
                    s,
                    Self::joined()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_round_trips_through_text() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
        }
        assert_eq!(
            "Science Fiction".parse::<Genre>().unwrap(),
            Genre::ScienceFiction
        );
    }

    #[test]
    fn test_genre_is_case_sensitive() {
        assert!("action".parse::<Genre>().is_err());
        assert!("Sci-Fi".parse::<Genre>().is_err());
    }

    #[test]
    fn test_language_rejects_unknown() {
        assert_eq!("Korean".parse::<Language>().unwrap(), Language::Korean);
        let err = "Klingon".parse::<Language>().unwrap_err();
        assert!(err.contains("Klingon"));
        assert!(err.contains("Japanese"));
    }
}
