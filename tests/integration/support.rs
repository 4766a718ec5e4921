use cinedex::config::{CatalogConfig, StorageConfig};
use cinedex::movie::Movie;
use cinedex::store::{CsvStore, MovieStore, TextEncoding};
use cinedex::tooling::cli::CliContext;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
    pub context: CliContext,
}

impl Workspace {
    /// Workspace with default storage settings.
    pub fn new() -> Self {
        Self::with_storage(StorageConfig::default())
    }

    pub fn with_storage(storage: StorageConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let config = CatalogConfig {
            storage,
            ..CatalogConfig::default()
        };
        let context = CliContext::with_config(dir.path().to_path_buf(), config).unwrap();
        Self { dir, context }
    }

    pub fn root(&self) -> PathBuf {
        self.context.paths().root.clone()
    }

    pub fn staging(&self) -> PathBuf {
        self.context.paths().staging_file.clone()
    }

    pub fn bucket(&self, relative: &str) -> PathBuf {
        self.root().join(relative).join("movies.csv")
    }

    pub fn stage(&self, movies: &[Movie]) {
        std::fs::create_dir_all(self.staging().parent().unwrap()).unwrap();
        store().write(&self.staging(), movies).unwrap();
    }
}

pub fn store() -> CsvStore {
    CsvStore::new(TextEncoding::Utf8Sig)
}

pub fn read(path: &Path) -> Vec<Movie> {
    store().read(path).unwrap()
}

pub fn movie(name: &str, genre: &str, year: &str, duration: &str, director: &str) -> Movie {
    Movie::new(name, genre, year, duration, "7.5", director, "English")
}
