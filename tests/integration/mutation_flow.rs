use crate::integration::support::{movie, read, Workspace};
use cinedex::catalog::MovieCatalog;
use cinedex::movie::{Attribute, DurationClass, Genre};
use cinedex::tooling::cli::{AddArgs, Commands};
use std::fs;

fn add_memento(ws: &Workspace) {
    ws.context
        .execute(&Commands::Add(AddArgs {
            name: "Memento".to_string(),
            genre: "Thriller".to_string(),
            year: "2000".to_string(),
            duration: "100".to_string(),
            rating: "8.4".to_string(),
            director: "Christopher Nolan".to_string(),
            language: "English".to_string(),
        }))
        .unwrap();
}

#[test]
fn duration_change_relocates_and_prunes_medium_bucket() {
    let ws = Workspace::new();
    add_memento(&ws);
    assert!(ws.bucket("Thriller/2000/medium").exists());

    let mut catalog = ws.context.load_catalog();
    let found = catalog
        .find_by_criteria("Memento", Genre::Thriller, 2000, DurationClass::Medium)
        .cloned()
        .unwrap();
    catalog.update(&found, Attribute::Duration, "150").unwrap();

    assert!(!ws.root().join("Thriller/2000/medium").exists());
    let long = read(&ws.bucket("Thriller/2000/long"));
    assert_eq!(long.len(), 1);
    assert_eq!(long[0].duration, "150");

    // A fresh load agrees with the in-memory state.
    let reloaded = ws.context.load_catalog();
    assert_eq!(reloaded.movies(), catalog.movies());
}

#[test]
fn year_change_removes_emptied_year_directory() {
    let ws = Workspace::new();
    add_memento(&ws);
    let mut catalog = ws.context.load_catalog();
    let found = catalog.movies()[0].clone();

    catalog.update(&found, Attribute::Year, "2001").unwrap();
    assert!(!ws.root().join("Thriller/2000").exists());
    assert!(ws.bucket("Thriller/2001/medium").exists());
}

#[test]
fn delete_of_record_missing_on_disk_warns() {
    let ws = Workspace::new();
    add_memento(&ws);
    let mut catalog: MovieCatalog = ws.context.load_catalog();
    fs::remove_file(ws.bucket("Thriller/2000/medium")).unwrap();

    let found = catalog.movies()[0].clone();
    let outcome = catalog.delete(&found).unwrap();
    assert!(outcome.warning.is_some());
    assert!(catalog.is_empty());
}

#[test]
fn delete_keeps_other_rows_in_bucket() {
    let ws = Workspace::new();
    add_memento(&ws);
    let mut catalog = ws.context.load_catalog();
    catalog
        .add(movie("Insomnia", "Thriller", "2000", "118", "Christopher Nolan"))
        .unwrap();

    let memento = catalog.movies()[0].clone();
    let outcome = catalog.delete(&memento).unwrap();
    assert_eq!(outcome.files_rewritten.len(), 1);
    let rest = read(&ws.bucket("Thriller/2000/medium"));
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].name, "Insomnia");
}

#[test]
fn prune_command_clears_header_only_buckets() {
    let ws = Workspace::new();
    let dir = ws.root().join("Western/1966/long");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("movies.csv"), "name,genre,year,duration,rating,director,language\n").unwrap();

    let out = ws.context.execute(&Commands::Prune).unwrap();
    assert!(out.starts_with("Removed 1 empty files"));
    assert!(!ws.root().join("Western").exists());
    assert!(ws.root().exists());
}
