//! Deploy commands - publish an app directory as a hub space

use crate::cli::commands::app_dir;
use crate::cli::commands::create_space::{self, CreateSpaceArgs};
use crate::cli::output::{colors, print_warning};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::publish::{
    create_space_from_local, HubClient, IdentityResolver, SpaceOptions, StaticNamespace,
};
use clap::Args;
use serde::Serialize;

/// Where and how the space is published
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Space repository name; defaults to the space name
    #[arg(long)]
    pub space_url_slug: Option<String>,

    /// Organization to deploy under (the token's user when omitted)
    #[arg(long)]
    pub organization: Option<String>,

    /// Space SDK; defaults to [apps].sdk
    #[arg(long, value_parser = ["gradio", "streamlit"])]
    pub sdk: Option<String>,

    /// Create a private space
    #[arg(long)]
    pub private: bool,

    /// Delete the local app directory after pushing it
    #[arg(long)]
    pub delete_after: bool,
}

/// Arguments for the deploy command
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[command(flatten)]
    pub create: CreateSpaceArgs,

    #[command(flatten)]
    pub publish: PublishArgs,
}

/// Arguments for the deploy-only command
#[derive(Args, Debug, Clone)]
pub struct DeployOnlyArgs {
    /// App name under <apps_dir>
    #[arg(long)]
    pub space_name: String,

    #[command(flatten)]
    pub publish: PublishArgs,
}

/// Deployment result
#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub space_name: String,
    pub app_dir: String,
    pub url: String,
    pub deleted_local: bool,
}

/// The injected identity: a fixed organization, or whoever the token is
pub fn identity<'a>(
    client: &'a HubClient,
    organization: Option<&str>,
) -> Box<dyn IdentityResolver + 'a> {
    match organization {
        Some(org) => Box::new(StaticNamespace(org.to_string())),
        None => Box::new(client),
    }
}

/// Execute the deploy command: index, render, publish
pub fn execute(
    args: DeployArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(sdk) = &args.publish.sdk {
        config.apps.sdk = sdk.clone();
    }

    let created = create_space::run(&args.create, &config)?;
    tracing::info!("Rendered app into {}", created.app_dir);

    let response = publish(&args.create.index.space_name, &args.publish, &config)?;
    print_response(&response, format)
}

/// Execute the deploy-only command
pub fn execute_only(
    args: DeployOnlyArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = publish(&args.space_name, &args.publish, config)?;
    print_response(&response, format)
}

fn publish(
    space_name: &str,
    args: &PublishArgs,
    config: &Config,
) -> Result<DeployResponse, Box<dyn std::error::Error>> {
    let local_dir = app_dir(config, space_name);
    let client = HubClient::from_config(&config.hub)?;
    let identity = identity(&client, args.organization.as_deref());

    let options = SpaceOptions {
        space_slug: args
            .space_url_slug
            .clone()
            .unwrap_or_else(|| space_name.to_string()),
        sdk: args.sdk.clone().unwrap_or_else(|| config.apps.sdk.clone()),
        private: args.private,
        delete_after_push: args.delete_after,
    };

    tracing::info!(
        "Creating space {} from {}",
        options.space_slug,
        local_dir.display()
    );
    let url = create_space_from_local(&client, identity.as_ref(), &local_dir, &options)?;

    Ok(DeployResponse {
        space_name: space_name.to_string(),
        app_dir: local_dir.display().to_string(),
        url,
        deleted_local: args.delete_after,
    })
}

fn print_response(
    response: &DeployResponse,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            println!(
                "Deployed '{}' to {}",
                colors::name(&response.space_name),
                colors::file_path(&response.url)
            );
            if response.deleted_local {
                print_warning(&format!("Removed local app {}", response.app_dir));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }
    Ok(())
}
