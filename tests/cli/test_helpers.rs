//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - A configuration rooted in a temporary apps directory
//! - Parsing argument lists into command argument structs

use clap::Parser;
use spacerini::cli::{Cli, Commands};
use spacerini::core::config::Config;
use spacerini::core::index::Threads;
use std::path::PathBuf;
use tempfile::TempDir;

/// Configuration whose apps live in a temporary directory
pub fn cli_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.apps.apps_dir = temp_dir.path().join("apps");
    config.apps.template = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/gradio");
    config.indexing.threads = Threads::Fixed(1);
    config.indexing.memory_buffer = "64".to_string();
    config.indexing.store_contents = true;
    (config, temp_dir)
}

/// Parse `spacerini <args>` into a command
pub fn parse(args: &[&str]) -> Commands {
    let argv = std::iter::once("spacerini").chain(args.iter().copied());
    Cli::try_parse_from(argv)
        .expect("Failed to parse arguments")
        .command
}

/// Parse `spacerini index <args>`
pub fn index_args(args: &[&str]) -> spacerini::cli::commands::IndexArgs {
    let mut argv = vec!["index"];
    argv.extend_from_slice(args);
    match parse(&argv) {
        Commands::Index(args) => args,
        other => panic!("expected index command, got {other:?}"),
    }
}

/// Parse `spacerini search <args>`
pub fn search_args(args: &[&str]) -> spacerini::cli::commands::SearchArgs {
    let mut argv = vec!["search"];
    argv.extend_from_slice(args);
    match parse(&argv) {
        Commands::Search(args) => args,
        other => panic!("expected search command, got {other:?}"),
    }
}
