//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for one
//! subcommand. `index`, `create_space` and `deploy` build on each other.

pub mod completions;
pub mod config;
pub mod create_space;
pub mod deploy;
pub mod hub_index;
pub mod index;
pub mod search;
pub mod shard;
pub mod stats;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use create_space::CreateSpaceArgs;
pub use deploy::{DeployArgs, DeployOnlyArgs};
pub use hub_index::{PullIndexArgs, PushIndexArgs};
pub use index::IndexArgs;
pub use search::SearchArgs;
pub use shard::ShardArgs;
pub use stats::StatsArgs;

use crate::core::config::Config;
use std::path::PathBuf;

/// Where an app lives locally: `<apps_dir>/<space_name>`
pub fn app_dir(config: &Config, space_name: &str) -> PathBuf {
    config.apps.apps_dir.join(space_name)
}

/// Sparse index directory of an app
pub fn sparse_index_dir(config: &Config, space_name: &str) -> PathBuf {
    app_dir(config, space_name).join("sparse_index")
}

/// Dense index directory of an app
pub fn dense_index_dir(config: &Config, space_name: &str) -> PathBuf {
    app_dir(config, space_name).join("dense_index")
}
