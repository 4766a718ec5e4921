//! The movie record and its identity rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

/// Column order of every record file.
pub const HEADER: [&str; 7] = [
    "name", "genre", "year", "duration", "rating", "director", "language",
];

/// A movie as stored at rest: seven text fields.
///
/// Rows from any record file deserialize into this type. Columns missing from
/// a file come through as empty strings and are rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub name: String,
    pub genre: String,
    pub year: String,
    pub duration: String,
    pub rating: String,
    pub director: String,
    pub language: String,
}

/// One of the seven record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Name,
    Genre,
    Year,
    Duration,
    Rating,
    Director,
    Language,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Name,
        Attribute::Genre,
        Attribute::Year,
        Attribute::Duration,
        Attribute::Rating,
        Attribute::Director,
        Attribute::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Name => HEADER[0],
            Attribute::Genre => HEADER[1],
            Attribute::Year => HEADER[2],
            Attribute::Duration => HEADER[3],
            Attribute::Rating => HEADER[4],
            Attribute::Director => HEADER[5],
            Attribute::Language => HEADER[6],
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Invalid attribute '{}'. Must be one of: {}",
                    s,
                    HEADER.join(", ")
                )
            })
    }
}

impl Movie {
    pub fn new(
        name: impl Into<String>,
        genre: impl Into<String>,
        year: impl Into<String>,
        duration: impl Into<String>,
        rating: impl Into<String>,
        director: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            genre: genre.into(),
            year: year.into(),
            duration: duration.into(),
            rating: rating.into(),
            director: director.into(),
            language: language.into(),
        }
    }

    pub fn get(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Name => &self.name,
            Attribute::Genre => &self.genre,
            Attribute::Year => &self.year,
            Attribute::Duration => &self.duration,
            Attribute::Rating => &self.rating,
            Attribute::Director => &self.director,
            Attribute::Language => &self.language,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) {
        let value = value.into();
        match attribute {
            Attribute::Name => self.name = value,
            Attribute::Genre => self.genre = value,
            Attribute::Year => self.year = value,
            Attribute::Duration => self.duration = value,
            Attribute::Rating => self.rating = value,
            Attribute::Director => self.director = value,
            Attribute::Language => self.language = value,
        }
    }

    /// Fields in header order.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.name,
            &self.genre,
            &self.year,
            &self.duration,
            &self.rating,
            &self.director,
            &self.language,
        ]
    }

    /// Copy with every field trimmed and NFC-normalized.
    pub fn normalized(&self) -> Movie {
        let mut out = Movie::default();
        for attribute in Attribute::ALL {
            out.set(attribute, normalize_field(self.get(attribute)));
        }
        out
    }

    /// First field that is empty after trimming, if any.
    pub fn first_empty_field(&self) -> Option<Attribute> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| self.get(*a).trim().is_empty())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.genre, self.year)
    }
}

fn normalize_field(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Two movies are identical iff all seven fields match after normalization.
pub fn identical(a: &Movie, b: &Movie) -> bool {
    Attribute::ALL
        .iter()
        .all(|attr| normalize_field(a.get(*attr)) == normalize_field(b.get(*attr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Movie {
        Movie::new(
            "Heat",
            "Crime",
            "1995",
            "170",
            "8.3",
            "Michael Mann",
            "English",
        )
    }

    #[test]
    fn test_identical_ignores_surrounding_whitespace() {
        let a = sample();
        let mut b = sample();
        b.name = "  Heat ".to_string();
        b.director = "Michael Mann\t".to_string();
        assert!(identical(&a, &b));
        assert!(identical(&b, &a));
    }

    #[test]
    fn test_identical_detects_any_field_difference() {
        let a = sample();
        for attribute in Attribute::ALL {
            let mut b = sample();
            b.set(attribute, format!("{}x", a.get(attribute)));
            assert!(!identical(&a, &b), "{} change not detected", attribute);
        }
    }

    #[test]
    fn test_identical_normalizes_composed_characters() {
        let mut a = sample();
        let mut b = sample();
        a.name = "Am\u{e9}lie".to_string();
        b.name = "Ame\u{301}lie".to_string();
        assert!(identical(&a, &b));
    }

    #[test]
    fn test_attribute_parse() {
        assert_eq!("Rating".parse::<Attribute>().unwrap(), Attribute::Rating);
        assert_eq!(" year ".parse::<Attribute>().unwrap(), Attribute::Year);
        assert!("budget".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_first_empty_field() {
        let mut movie = sample();
        assert_eq!(movie.first_empty_field(), None);
        movie.director = "   ".to_string();
        assert_eq!(movie.first_empty_field(), Some(Attribute::Director));
    }

    fn arb_movie() -> impl Strategy<Value = Movie> {
        proptest::collection::vec("[ a-zA-Z0-9.]{0,12}", 7).prop_map(|f| {
            Movie::new(&f[0], &f[1], &f[2], &f[3], &f[4], &f[5], &f[6])
        })
    }

    proptest! {
        #[test]
        fn identical_is_reflexive(m in arb_movie()) {
            prop_assert!(identical(&m, &m));
        }

        #[test]
        fn identical_is_symmetric(a in arb_movie(), b in arb_movie()) {
            prop_assert_eq!(identical(&a, &b), identical(&b, &a));
        }

        #[test]
        fn identical_ignores_padding(m in arb_movie(), pad in "[ \t]{0,3}") {
            let mut padded = m.clone();
            for attribute in Attribute::ALL {
                let value = format!("{pad}{}{pad}", m.get(attribute));
                padded.set(attribute, value);
            }
            prop_assert!(identical(&m, &padded));
        }
    }
}
