//! Spacerini CLI - build and deploy search demo apps
//!
//! # Examples
//!
//! ```bash
//! # Shard a local dataset into 10MB JSON-lines files
//! spacerini shard data.jsonl --column text --output-dir shards
//!
//! # Index a hub dataset into apps/imdb/sparse_index
//! spacerini index --space-name imdb --dataset imdb --content-column text
//!
//! # Search it
//! spacerini search "great movie" --space-name imdb
//!
//! # Index, render and deploy in one go
//! spacerini deploy --space-name imdb --dataset imdb --space-title "IMDB search"
//! ```
//!
//! Logs go to stderr. `RUST_LOG` sets the filter (default
//! `spacerini=info`); `SPACERINI_LOG_FORMAT=json` switches to JSON lines.

use clap::Parser;
use spacerini::cli::{output, run, Cli};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "spacerini=info".into());
    let json = std::env::var("SPACERINI_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr); // stdout carries command output
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
