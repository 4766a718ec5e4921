use crate::integration::support::{movie, read, Workspace};
use cinedex::catalog::MovieCatalog;
use cinedex::categorize::CategorizationEngine;
use cinedex::bucket::BucketResolver;
use cinedex::store::CsvStore;
use cinedex::tooling::cli::Commands;
use std::sync::Arc;

#[test]
fn valid_and_invalid_rows_are_split_between_bucket_and_staging() {
    let ws = Workspace::new();
    let valid = movie("Tenet", "Action", "2020", "95", "Christopher Nolan");
    let invalid = movie("Nameless", "Action", "2020", "95", "");
    ws.stage(&[valid.clone(), invalid.clone()]);

    let out = ws
        .context
        .execute(&Commands::Categorize {
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["stats"]["total_movies_processed"], 1);
    assert_eq!(report["stats"]["validation_errors"], 1);

    assert_eq!(read(&ws.bucket("Action/2020/medium")), vec![valid]);
    assert_eq!(read(&ws.staging()), vec![invalid]);
}

#[test]
fn unknown_genre_never_reaches_a_bucket() {
    let ws = Workspace::new();
    ws.stage(&[movie("Dune", "Sci-Fi", "2021", "155", "Denis Villeneuve")]);

    ws.context
        .execute(&Commands::Categorize {
            format: "text".to_string(),
        })
        .unwrap();

    let catalog = ws.context.load_catalog();
    assert!(catalog.is_empty());
    assert!(!ws.root().join("Sci-Fi").exists());
    assert_eq!(read(&ws.staging())[0].genre, "Sci-Fi");
}

#[test]
fn second_run_over_same_content_adds_nothing() {
    let ws = Workspace::new();
    let rows = vec![
        movie("Heat", "Crime", "1995", "170", "Michael Mann"),
        movie("Heat", "Crime", "1995", "170", "Michael Mann"),
        movie("Thief", "Crime", "1981", "122", "Michael Mann"),
    ];
    let engine = CategorizationEngine::new(
        BucketResolver::new(ws.root(), "csv"),
        Arc::new(CsvStore::default()),
        ws.staging(),
    );

    ws.stage(&rows);
    let first = engine.categorize().unwrap();
    assert_eq!(first.stats.total_movies_processed, 2);
    assert_eq!(first.stats.duplicate_movies_skipped, 1);

    ws.stage(&rows);
    let second = engine.categorize().unwrap();
    assert_eq!(second.stats.total_movies_processed, 0);
    assert_eq!(second.stats.duplicate_movies_skipped, 3);
    assert_eq!(read(&ws.bucket("Crime/1995/long")).len(), 1);
    assert_eq!(read(&ws.staging()).len(), 3);
}

#[test]
fn init_then_categorize_feeds_the_catalog() {
    let ws = Workspace::new();
    ws.context
        .execute(&Commands::Init {
            write_config: false,
            force: false,
        })
        .unwrap();
    ws.stage(&[
        movie("Alien", "Horror", "1979", "117", "Ridley Scott"),
        movie("Ran", "Drama", "1985", "160", "Akira Kurosawa"),
    ]);
    ws.context
        .execute(&Commands::Categorize {
            format: "text".to_string(),
        })
        .unwrap();

    let catalog: MovieCatalog = ws.context.load_catalog();
    let names: Vec<&str> = catalog.movies().iter().map(|m| m.name.as_str()).collect();
    // Traversal is sorted by directory name.
    assert_eq!(names, vec!["Ran", "Alien"]);
}
