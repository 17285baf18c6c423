//! Show-config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show resolved directories
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    pub hub_token: &'static str,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    explicit: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_file = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| xdg.config_file());

    let response = ConfigResponse {
        config_file: args.all.then(|| config_file.display().to_string()),
        cache_dir: args.all.then(|| xdg.hub_cache_dir().display().to_string()),
        hub_token: if config.hub.token.is_some() { "set" } else { "not set" },
        config,
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            if let Some(file) = &response.config_file {
                println!("# config file: {file}");
            }
            if let Some(cache) = &response.cache_dir {
                println!("# hub cache:   {cache}");
            }
            println!("# hub token:   {}", response.hub_token);
            print!("{}", toml::to_string_pretty(config)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
