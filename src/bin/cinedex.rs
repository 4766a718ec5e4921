//! Cinedex CLI Binary
//!
//! Command-line interface for the personal movie catalog.

use anyhow::Context;
use cinedex::logging::init_logging;
use cinedex::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Create CLI context
    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone())
        .with_context(|| format!("initializing workspace {}", cli.workspace.display()))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    // CLI flags take precedence over the loaded [logging] section
    let mut logging = context.config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if let Err(e) = init_logging(&logging, cli.log_file.clone()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
