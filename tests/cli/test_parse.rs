//! Argument parsing for every subcommand

use super::test_helpers::{cli_test_config, index_args, parse, search_args};
use clap::Parser;
use spacerini::cli::{Cli, Commands, OutputFormat};
use spacerini::core::index::{build_args, Threads};
use std::path::{Path, PathBuf};

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "spacerini",
        "stats",
        "idx",
        "--format",
        "json",
        "--config-file",
        "conf.toml",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.config_file, Some(PathBuf::from("conf.toml")));
    assert!(matches!(cli.command, Commands::Stats(_)));
}

#[test]
fn test_index_defaults() {
    let args = index_args(&["--space-name", "imdb", "--dataset", "imdb"]);

    assert_eq!(args.space_name, "imdb");
    assert_eq!(args.dataset.split, "train");
    assert_eq!(args.dataset.content_column, "text");
    assert_eq!(args.dataset.columns(), vec!["text".to_string()]);
    assert!(args.dataset.docid_column.is_none());
    assert_eq!(args.batch_size, 64);
    assert!(!args.force);
}

#[test]
fn test_index_engine_flags() {
    let args = index_args(&[
        "--space-name",
        "s",
        "--dataset",
        "d.jsonl",
        "--columns-to-index",
        "title",
        "plot",
        "--threads",
        "4",
        "--language",
        "fr",
        "--store-raw",
        "--optimize-index",
    ]);

    assert_eq!(
        args.dataset.columns(),
        vec!["text".to_string(), "title".to_string(), "plot".to_string()]
    );
    assert_eq!(args.flags.threads, Some(Threads::Fixed(4)));
    assert_eq!(args.flags.language.as_deref(), Some("fr"));
    assert_eq!(args.flags.store_raw, Some(true));
    assert_eq!(args.flags.optimize_index, Some(true));
    assert_eq!(args.flags.store_contents, None);
}

#[test]
fn test_switches_override_configuration_both_ways() {
    let (config, _temp) = cli_test_config();
    assert!(config.indexing.store_positions);
    assert!(config.indexing.store_contents);

    let args = index_args(&[
        "--space-name",
        "s",
        "--dataset",
        "d.jsonl",
        "--store-positions=false",
        "--store-contents=false",
        "--store-docvectors",
    ]);
    assert_eq!(args.flags.store_positions, Some(false));
    assert_eq!(args.flags.store_docvectors, Some(true));

    let options = args.flags.to_options(&config, Path::new("idx"));
    assert!(!options.store_positions);
    assert!(!options.store_contents);
    assert!(options.store_docvectors);

    let flags = build_args(&options);
    assert!(!flags.contains(&"-storePositions".to_string()));
    assert!(!flags.contains(&"-storeContents".to_string()));
    assert!(flags.contains(&"-storeDocvectors".to_string()));

    // Unset switches keep the configured value
    let defaults = index_args(&["--space-name", "s", "--dataset", "d.jsonl"]);
    let options = defaults.flags.to_options(&config, Path::new("idx"));
    assert!(options.store_positions);
    assert!(options.store_contents);
}

#[test]
fn test_search_flags() {
    let args = search_args(&["great movie", "-s", "imdb", "-k", "20", "--alpha", "0.5"]);

    assert_eq!(args.query, "great movie");
    assert_eq!(args.space_name.as_deref(), Some("imdb"));
    assert_eq!(args.limit, Some(20));
    assert_eq!(args.alpha, Some(0.5));
    assert_eq!(args.page, 0);
}

#[test]
fn test_deploy_requires_sdk_choice() {
    let ok = Cli::try_parse_from([
        "spacerini",
        "deploy",
        "--space-name",
        "s",
        "--dataset",
        "d",
        "--sdk",
        "streamlit",
    ]);
    assert!(ok.is_ok());

    let bad = Cli::try_parse_from([
        "spacerini",
        "deploy",
        "--space-name",
        "s",
        "--dataset",
        "d",
        "--sdk",
        "flask",
    ]);
    assert!(bad.is_err());
}

#[test]
fn test_hub_index_commands() {
    assert!(matches!(
        parse(&["push-index", "apps/imdb/sparse_index", "--dataset-slug", "imdb-index"]),
        Commands::PushIndex(_)
    ));
    assert!(matches!(
        parse(&["pull-index", "--dataset-slug", "imdb-index", "--organization", "org"]),
        Commands::PullIndex(_)
    ));
}

#[test]
fn test_other_commands_parse() {
    assert!(matches!(
        parse(&["shard", "d.jsonl", "-c", "text", "-o", "shards"]),
        Commands::Shard(_)
    ));
    assert!(matches!(
        parse(&["create-space", "--space-name", "s", "--dataset", "d"]),
        Commands::CreateSpace(_)
    ));
    assert!(matches!(
        parse(&["deploy-only", "--space-name", "s"]),
        Commands::DeployOnly(_)
    ));
    assert!(matches!(parse(&["show-config", "-a"]), Commands::ShowConfig(_)));
    assert!(matches!(parse(&["completions", "zsh"]), Commands::Completions(_)));
}

#[test]
fn test_missing_required_argument_fails() {
    assert!(Cli::try_parse_from(["spacerini", "index", "--dataset", "d"]).is_err());
}
