//! Movie Record Model
//!
//! The seven-field movie record, the closed genre and language sets, duration
//! classification, validation, and record identity.

pub mod catalog_values;
pub mod duration;
pub mod record;
pub mod validation;

pub use catalog_values::{Genre, Language};
pub use duration::{classify_duration, DurationClass};
pub use record::{identical, Attribute, Movie, HEADER};
pub use validation::{validate, ValidatedMovie, ValidationError, MAX_RATING};
