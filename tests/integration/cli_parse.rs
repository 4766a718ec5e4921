use clap::{CommandFactory, Parser};
use cinedex::movie::{Attribute, DurationClass, Genre};
use cinedex::tooling::cli::{Cli, Commands, FilterCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["cinedex", "init"],
        vec!["cinedex", "init", "--write-config", "--force"],
        vec!["cinedex", "categorize", "--format", "json"],
        vec!["cinedex", "list", "--locations"],
        vec!["cinedex", "stats"],
        vec!["cinedex", "sort", "rating", "--desc"],
        vec!["cinedex", "filter", "genre", "Science Fiction"],
        vec!["cinedex", "filter", "year", "2000", "1990"],
        vec!["cinedex", "filter", "rating", "7.5", "9"],
        vec!["cinedex", "filter", "director", "nolan"],
        vec!["cinedex", "filter", "language", "Korean"],
        vec![
            "cinedex", "add", "--name", "Oldboy", "--genre", "Thriller", "--year", "2003",
            "--duration", "120", "--rating", "8.4", "--director", "Park Chan-wook",
            "--language", "Korean",
        ],
        vec!["cinedex", "prune"],
        vec!["cinedex", "menu"],
        vec!["cinedex", "--workspace", "/tmp", "--log-level", "debug", "run"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_typed_selector_values() {
    let cli = Cli::try_parse_from([
        "cinedex", "update", "--name", "Oldboy", "--genre", "Thriller", "--year", "2003",
        "--class", "medium", "--attribute", "Rating", "--value", "8.5",
    ])
    .unwrap();

    match cli.command {
        Commands::Update {
            movie,
            attribute,
            value,
        } => {
            assert_eq!(movie.genre, Genre::Thriller);
            assert_eq!(movie.duration_class, DurationClass::Medium);
            assert_eq!(attribute, Attribute::Rating);
            assert_eq!(value, "8.5");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_rejects_values_outside_closed_sets() {
    assert!(Cli::try_parse_from(["cinedex", "filter", "genre", "Sci-Fi"]).is_err());
    assert!(Cli::try_parse_from(["cinedex", "sort", "budget"]).is_err());
    assert!(Cli::try_parse_from([
        "cinedex", "delete", "--name", "X", "--genre", "Drama", "--year", "2000", "--class",
        "epic",
    ])
    .is_err());
    assert!(Cli::try_parse_from(["cinedex", "filter", "year", "1990"]).is_err());
}

#[test]
fn parse_filter_language() {
    let cli = Cli::try_parse_from(["cinedex", "filter", "language", "Japanese"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Filter {
            command: FilterCommands::Language { .. }
        }
    ));
}

#[test]
fn top_level_help_lists_every_command() {
    let mut command = Cli::command();
    let mut output = Vec::new();
    command.write_long_help(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    for token in [
        "init", "categorize", "list", "stats", "sort", "filter", "add", "update", "delete",
        "prune", "menu", "run", "--workspace", "--config",
    ] {
        assert!(output.contains(token), "help is missing {token}");
    }
}
