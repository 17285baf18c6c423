//! Command-line interface for spacerini
//!
//! Thin clap adapter over `core/`: each subcommand parses its arguments,
//! calls into the library and prints the outcome as text or JSON.
//!
//! ```text
//!   index ──> create-space ──> deploy
//!                                 ^
//!                          deploy-only
//! ```
//!
//! `create-space` indexes first, `deploy` indexes, scaffolds and uploads;
//! `deploy-only` uploads an app directory that already exists.

pub mod commands;
pub mod output;

use crate::core::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spacerini - build and deploy search demo apps
///
/// Shards and indexes datasets, searches the resulting indexes, renders
/// app templates and publishes apps and indexes to the hub.
#[derive(Parser, Debug)]
#[command(name = "spacerini")]
#[command(version)]
#[command(about = "Build and deploy search demo apps over datasets", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides the XDG and working-directory files)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a dataset into JSON-lines shards
    Shard(commands::ShardArgs),

    /// Index a dataset into an app directory (no app, no deploy)
    Index(commands::IndexArgs),

    /// Index a dataset and render the app locally (no deploy)
    #[command(name = "create-space")]
    CreateSpace(commands::CreateSpaceArgs),

    /// Index, render and deploy a new space
    Deploy(commands::DeployArgs),

    /// Deploy an app directory that already exists
    #[command(name = "deploy-only")]
    DeployOnly(commands::DeployOnlyArgs),

    /// Search a sparse, dense or hybrid index
    Search(commands::SearchArgs),

    /// Show index statistics
    Stats(commands::StatsArgs),

    /// Push an index to the hub as a dataset repository
    #[command(name = "push-index")]
    PushIndex(commands::PushIndexArgs),

    /// Download an index pushed with push-index
    #[command(name = "pull-index")]
    PullIndex(commands::PullIndexArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  spacerini completions bash > ~/.local/share/bash-completion/completions/spacerini
    ///   zsh:   spacerini completions zsh > ~/.zfunc/_spacerini
    ///   fish:  spacerini completions fish > ~/.config/fish/completions/spacerini.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::xdg::XdgDirs;

    // Completions need no configuration
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    let config = Config::load_from(cli.config_file.as_deref())?;
    config.log_config();

    match cli.command {
        Commands::Shard(args) => commands::shard::execute(args, &config, cli.format),
        Commands::Index(args) => commands::index::execute(args, &config, cli.format),
        Commands::CreateSpace(args) => commands::create_space::execute(args, &config, cli.format),
        Commands::Deploy(args) => commands::deploy::execute(args, &config, cli.format),
        Commands::DeployOnly(args) => commands::deploy::execute_only(args, &config, cli.format),
        Commands::Search(args) => commands::search::execute(args, &config, cli.format),
        Commands::Stats(args) => commands::stats::execute(args, cli.format),
        Commands::PushIndex(args) => commands::hub_index::execute_push(args, &config, cli.format),
        Commands::PullIndex(args) => {
            commands::hub_index::execute_pull(args, &config, &xdg, cli.format)
        }
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &config, &xdg, cli.config_file.as_deref(), cli.format)
        }
        Commands::Completions(_) => Ok(()), // Handled above
    }
}
