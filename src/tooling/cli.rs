//! CLI Tooling
//!
//! Command-line interface for the movie catalog. Every command is resolved
//! against one workspace and one loaded configuration.

use crate::bucket::BucketResolver;
use crate::catalog::MovieCatalog;
use crate::categorize::CategorizationEngine;
use crate::config::{CatalogConfig, ConfigLoader, StoragePaths, WORKSPACE_CONFIG_FILE};
use crate::error::CatalogError;
use crate::layout::{prepare_workspace, LayoutReport};
use crate::movie::{Attribute, DurationClass, Genre, Language, Movie};
use crate::query::{self, MovieFilter};
use crate::store::{CsvStore, MovieStore};
use crate::tooling::format::{
    format_categorization_text, format_delete_text, format_layout_text, format_movies_table,
    format_prune_text, format_stats_text, format_update_text, to_json, OutputFormat, StatsOutput,
};
use crate::tooling::menu::Menu;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Cinedex CLI - personal movie catalog
#[derive(Parser, Debug)]
#[command(name = "cinedex")]
#[command(about = "Categorize a staging CSV of movies into genre/year/duration buckets and manage the catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces <workspace>/cinedex.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog root and staging file, moving a misplaced staging file into place
    Init {
        /// Also write the effective configuration to <workspace>/cinedex.toml
        #[arg(long)]
        write_config: bool,
        /// Overwrite an existing cinedex.toml
        #[arg(long)]
        force: bool,
    },
    /// Move valid, non-duplicate staging rows into their buckets
    Categorize {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every movie in the catalog
    List {
        /// Include each movie's bucket directory
        #[arg(long)]
        locations: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show counts and duration averages
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List movies sorted by one attribute
    Sort {
        /// name, genre, year, duration, rating, director or language
        attribute: Attribute,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },
    /// List movies matching one criterion
    Filter {
        #[command(subcommand)]
        command: FilterCommands,
    },
    /// Add a movie to the catalog
    Add(AddArgs),
    /// Change one attribute of a movie
    Update {
        #[command(flatten)]
        movie: MovieSelector,
        /// Attribute to change
        #[arg(long)]
        attribute: Attribute,
        /// New value
        #[arg(long)]
        value: String,
    },
    /// Delete a movie from the catalog
    Delete {
        #[command(flatten)]
        movie: MovieSelector,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Remove empty bucket files and directories
    Prune,
    /// Interactive menu
    Menu,
    /// Init, categorize, then open the interactive menu
    Run,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Movies of one genre
    Genre { genre: Genre },
    /// Release year range, inclusive
    Year { min: u32, max: u32 },
    /// Duration range in minutes, inclusive
    Duration { min: u32, max: u32 },
    /// Rating range on the 0-10 scale, inclusive
    Rating { min: f32, max: f32 },
    /// Director name contains this text (case-insensitive)
    Director { fragment: String },
    /// Movies in one original language
    Language { language: Language },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub genre: String,
    #[arg(long)]
    pub year: String,
    #[arg(long)]
    pub duration: String,
    #[arg(long)]
    pub rating: String,
    #[arg(long)]
    pub director: String,
    #[arg(long)]
    pub language: String,
}

impl From<&AddArgs> for Movie {
    fn from(args: &AddArgs) -> Self {
        Movie::new(
            args.name.as_str(),
            args.genre.as_str(),
            args.year.as_str(),
            args.duration.as_str(),
            args.rating.as_str(),
            args.director.as_str(),
            args.language.as_str(),
        )
    }
}

/// Identifies a movie the way `find_by_criteria` does.
#[derive(Args, Debug, Clone)]
pub struct MovieSelector {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub genre: Genre,
    #[arg(long)]
    pub year: u32,
    /// Duration class: short, medium or long
    #[arg(long = "class")]
    pub duration_class: DurationClass,
}

/// CLI context for one workspace
pub struct CliContext {
    config: CatalogConfig,
    paths: StoragePaths,
    store: Arc<dyn MovieStore>,
    resolver: BucketResolver,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, CatalogError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: CatalogConfig) -> Result<Self, CatalogError> {
        let paths = config.storage.resolve_paths(&workspace_root)?;
        let store: Arc<dyn MovieStore> = Arc::new(CsvStore::new(config.storage.text_encoding()?));
        let resolver = BucketResolver::new(&paths.root, &config.storage.file_format);
        Ok(Self {
            config,
            paths,
            store,
            resolver,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Load the catalog from the buckets on disk.
    pub fn load_catalog(&self) -> MovieCatalog {
        MovieCatalog::load(Arc::clone(&self.store), self.resolver.clone())
    }

    fn engine(&self) -> CategorizationEngine {
        CategorizationEngine::new(
            self.resolver.clone(),
            Arc::clone(&self.store),
            &self.paths.staging_file,
        )
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, CatalogError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Init {
                write_config,
                force,
            } => self.handle_init(*write_config, *force),
            Commands::Categorize { format } => self.handle_categorize(format),
            Commands::List { locations, format } => self.handle_list(*locations, format),
            Commands::Stats { format } => self.handle_stats(format),
            Commands::Sort { attribute, desc } => {
                let catalog = self.load_catalog();
                let sorted = query::sort_by(catalog.movies(), *attribute, *desc);
                Ok(format_movies_table(&sorted, None))
            }
            Commands::Filter { command } => self.handle_filter(command),
            Commands::Add(args) => {
                let mut catalog = self.load_catalog();
                let key = catalog.add(Movie::from(args))?;
                Ok(format!("Added '{}' to {}", args.name.trim(), key))
            }
            Commands::Update {
                movie,
                attribute,
                value,
            } => {
                let mut catalog = self.load_catalog();
                let found = find(&catalog, movie)?;
                let outcome = catalog.update(&found, *attribute, value)?;
                Ok(format_update_text(&outcome))
            }
            Commands::Delete { movie, force } => self.handle_delete(movie, *force),
            Commands::Prune => Ok(format_prune_text(&self.load_catalog().prune_empty())),
            Commands::Menu => self.handle_menu(),
            Commands::Run => self.handle_run(),
        }
    }

    fn handle_init(&self, write_config: bool, force: bool) -> Result<String, CatalogError> {
        let report = prepare_workspace(&self.paths, self.store.as_ref())?;
        let mut out = format_layout_text(&report);
        if write_config {
            out.push('\n');
            out.push_str(&self.write_config(force)?);
        }
        Ok(out)
    }

    fn write_config(&self, force: bool) -> Result<String, CatalogError> {
        let path = self.paths.workspace_root.join(WORKSPACE_CONFIG_FILE);
        if path.exists() && !force {
            return Ok(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            ));
        }
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| CatalogError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&path, content)
            .map_err(|e| crate::error::StorageError::io(&path, e))?;
        Ok(format!("Config written: {}", path.display()))
    }

    fn handle_categorize(&self, format: &str) -> Result<String, CatalogError> {
        let format = OutputFormat::parse(format)?;
        let report = self.engine().categorize()?;
        match format {
            OutputFormat::Text => Ok(format_categorization_text(&report)),
            OutputFormat::Json => to_json(&report),
        }
    }

    fn handle_list(&self, locations: bool, format: &str) -> Result<String, CatalogError> {
        let format = OutputFormat::parse(format)?;
        let catalog = self.load_catalog();
        match format {
            OutputFormat::Text => Ok(format_movies_table(
                catalog.movies(),
                locations.then_some(&self.resolver),
            )),
            OutputFormat::Json => to_json(&catalog.movies()),
        }
    }

    fn handle_stats(&self, format: &str) -> Result<String, CatalogError> {
        let format = OutputFormat::parse(format)?;
        let catalog = self.load_catalog();
        match format {
            OutputFormat::Text => Ok(format_stats_text(catalog.movies())),
            OutputFormat::Json => to_json(&StatsOutput::from_movies(catalog.movies())),
        }
    }

    fn handle_filter(&self, command: &FilterCommands) -> Result<String, CatalogError> {
        let filter = match command {
            FilterCommands::Genre { genre } => MovieFilter::Genre(*genre),
            FilterCommands::Year { min, max } => MovieFilter::year_range(*min, *max),
            FilterCommands::Duration { min, max } => MovieFilter::duration_range(*min, *max),
            FilterCommands::Rating { min, max } => MovieFilter::rating_range(*min, *max)?,
            FilterCommands::Director { fragment } => MovieFilter::director(fragment),
            FilterCommands::Language { language } => MovieFilter::Language(*language),
        };
        let matches = filter.apply(self.load_catalog().movies());
        if matches.is_empty() {
            return Ok("No movies match the filter criteria".to_string());
        }
        Ok(format_movies_table(&matches, None))
    }

    fn handle_delete(&self, selector: &MovieSelector, force: bool) -> Result<String, CatalogError> {
        let mut catalog = self.load_catalog();
        let found = find(&catalog, selector)?;
        if !force {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete '{}'?", found.name))
                .interact()
                .map_err(|e| CatalogError::InvalidInput(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }
        let outcome = catalog.delete(&found)?;
        Ok(format_delete_text(&outcome))
    }

    fn handle_menu(&self) -> Result<String, CatalogError> {
        let mut menu = Menu::new(self.load_catalog());
        menu.run()?;
        Ok(String::new())
    }

    fn handle_run(&self) -> Result<String, CatalogError> {
        let layout: LayoutReport = prepare_workspace(&self.paths, self.store.as_ref())?;
        println!("{}\n", format_layout_text(&layout));
        let report = self.engine().categorize()?;
        println!("{}", format_categorization_text(&report));
        self.handle_menu()
    }
}

fn find(catalog: &MovieCatalog, selector: &MovieSelector) -> Result<Movie, CatalogError> {
    catalog
        .find_by_criteria(
            &selector.name,
            selector.genre,
            selector.year,
            selector.duration_class,
        )
        .cloned()
        .ok_or_else(|| CatalogError::MovieNotFound(selector.name.trim().to_string()))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init { .. } => "init",
        Commands::Categorize { .. } => "categorize",
        Commands::List { .. } => "list",
        Commands::Stats { .. } => "stats",
        Commands::Sort { .. } => "sort",
        Commands::Filter { .. } => "filter",
        Commands::Add(_) => "add",
        Commands::Update { .. } => "update",
        Commands::Delete { .. } => "delete",
        Commands::Prune => "prune",
        Commands::Menu => "menu",
        Commands::Run => "run",
    }
}
