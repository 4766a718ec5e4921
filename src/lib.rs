//! Cinedex: Personal Movie Catalog
//!
//! Categorizes a staging file of movie records into a
//! `<genre>/<year>/<duration class>` bucket hierarchy of CSV files, and keeps
//! that hierarchy consistent as movies are added, updated and deleted.

pub mod aggregate;
pub mod bucket;
pub mod catalog;
pub mod categorize;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod movie;
pub mod query;
pub mod store;
pub mod tooling;
