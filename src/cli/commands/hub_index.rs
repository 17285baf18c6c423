//! Push-index and pull-index commands

use crate::cli::commands::deploy::identity;
use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::publish::{load_index_from_hub, push_index_to_hub, HubClient};
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the push-index command
#[derive(Args, Debug)]
pub struct PushIndexArgs {
    /// Index directory to push
    pub index_path: PathBuf,

    /// Dataset repository name
    #[arg(long)]
    pub dataset_slug: String,

    /// Organization to push under (the token's user when omitted)
    #[arg(long)]
    pub organization: Option<String>,

    /// Create a private dataset
    #[arg(long)]
    pub private: bool,

    /// Delete the local index after pushing it
    #[arg(long)]
    pub delete_after: bool,
}

/// Arguments for the pull-index command
#[derive(Args, Debug)]
pub struct PullIndexArgs {
    /// Dataset repository name
    #[arg(long)]
    pub dataset_slug: String,

    /// Organization the dataset lives under (the token's user when omitted)
    #[arg(long)]
    pub organization: Option<String>,

    /// Download location; defaults to the XDG cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Push or pull result
#[derive(Debug, Serialize)]
pub struct HubIndexResponse {
    pub dataset_slug: String,
    pub index_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Execute the push-index command
pub fn execute_push(
    args: PushIndexArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HubClient::from_config(&config.hub)?;
    let identity = identity(&client, args.organization.as_deref());

    let url = push_index_to_hub(
        &client,
        identity.as_ref(),
        &args.dataset_slug,
        &args.index_path,
        args.private,
        args.delete_after,
    )?;

    let response = HubIndexResponse {
        dataset_slug: args.dataset_slug,
        index_path: args.index_path.display().to_string(),
        url: Some(url),
    };
    match format {
        OutputFormat::Human => {
            println!(
                "Pushed {} to {}",
                colors::file_path(&response.index_path),
                colors::file_path(response.url.as_deref().unwrap_or_default())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

/// Execute the pull-index command
pub fn execute_pull(
    args: PullIndexArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache_dir = args.cache_dir.clone().unwrap_or_else(|| xdg.hub_cache_dir());
    fs::create_dir_all(&cache_dir)?;

    let client = HubClient::from_config(&config.hub)?;
    let identity = identity(&client, args.organization.as_deref());
    let index_path = load_index_from_hub(&client, identity.as_ref(), &args.dataset_slug, &cache_dir)?;

    let response = HubIndexResponse {
        dataset_slug: args.dataset_slug,
        index_path: index_path.display().to_string(),
        url: None,
    };
    match format {
        OutputFormat::Human => {
            println!(
                "Pulled '{}' into {}",
                colors::name(&response.dataset_slug),
                colors::file_path(&response.index_path)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
