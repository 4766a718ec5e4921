//! Integration tests for the cinedex movie catalog

mod categorize_flow;
mod cli_parse;
mod mutation_flow;
mod support;
