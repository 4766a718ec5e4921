//! Duration classes derived from running time in minutes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound (exclusive) of the short class.
pub const SHORT_BELOW: u32 = 90;
/// Upper bound (inclusive) of the medium class.
pub const MEDIUM_UP_TO: u32 = 120;

/// Three-valued category derived from a movie's duration. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    Short,
    Medium,
    Long,
}

impl DurationClass {
    pub const ALL: [DurationClass; 3] = [
        DurationClass::Short,
        DurationClass::Medium,
        DurationClass::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationClass::Short => "short",
            DurationClass::Medium => "medium",
            DurationClass::Long => "long",
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(DurationClass::Short),
            "medium" => Ok(DurationClass::Medium),
            "long" => Ok(DurationClass::Long),
            _ => Err(format!(
                "Invalid duration class '{}'. Must be short, medium or long",
                s
            )),
        }
    }
}

/// Classify a validated duration in minutes.
///
/// Callers validate first; the function itself is total over `u32`.
pub fn classify_duration(duration: u32) -> DurationClass {
    if duration < SHORT_BELOW {
        DurationClass::Short
    } else if duration <= MEDIUM_UP_TO {
        DurationClass::Medium
    } else {
        DurationClass::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify_duration(89), DurationClass::Short);
        assert_eq!(classify_duration(90), DurationClass::Medium);
        assert_eq!(classify_duration(120), DurationClass::Medium);
        assert_eq!(classify_duration(121), DurationClass::Long);
    }

    #[test]
    fn test_parse_class() {
        for class in DurationClass::ALL {
            assert_eq!(class.as_str().parse::<DurationClass>().unwrap(), class);
        }
        assert!("Medium".parse::<DurationClass>().is_err());
    }

    proptest! {
        #[test]
        fn short_below_ninety(d in 1u32..90) {
            prop_assert_eq!(classify_duration(d), DurationClass::Short);
        }

        #[test]
        fn medium_between_ninety_and_one_twenty(d in 90u32..=120) {
            prop_assert_eq!(classify_duration(d), DurationClass::Medium);
        }

        #[test]
        fn long_above_one_twenty(d in 121u32..100_000) {
            prop_assert_eq!(classify_duration(d), DurationClass::Long);
        }
    }
}
