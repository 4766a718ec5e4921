//! Tooling & Integration Layer
//!
//! The command-line surface, output rendering, and the interactive menu.

pub mod cli;
pub mod format;
pub mod menu;

pub use cli::{Cli, CliContext, Commands};
pub use menu::{parse_bounded_option, Menu};
