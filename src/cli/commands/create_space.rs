//! Create-space command - index a dataset and render the app locally

use crate::cli::commands::index::{self, IndexArgs, IndexResponse};
use crate::cli::output::{colors, print_success};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::scaffold::{create_app, Context};
use clap::Args;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// Template variables for the app
#[derive(Args, Debug, Clone)]
pub struct AppArgs {
    /// Title shown on the space
    #[arg(long)]
    pub space_title: Option<String>,

    /// Description of the space
    #[arg(long)]
    pub description: Option<String>,

    /// Template directory; defaults to [apps].template
    #[arg(long)]
    pub template: Option<PathBuf>,
}

/// Arguments for the create-space command
#[derive(Args, Debug, Clone)]
pub struct CreateSpaceArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    #[command(flatten)]
    pub app: AppArgs,
}

/// Create-space result
#[derive(Debug, Serialize)]
pub struct CreateSpaceResponse {
    pub index: IndexResponse,
    pub app_dir: String,
    pub template: String,
}

/// Execute the create-space command
pub fn execute(
    args: CreateSpaceArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = run(&args, config)?;

    match format {
        OutputFormat::Human => {
            println!(
                "Indexed {} documents for '{}'",
                colors::number(&response.index.documents.to_string()),
                colors::name(&response.index.space_name)
            );
            print_success(&format!("Rendered app into {}", response.app_dir));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

/// Index, then render the template into the app directory
pub fn run(
    args: &CreateSpaceArgs,
    config: &Config,
) -> Result<CreateSpaceResponse, Box<dyn std::error::Error>> {
    let index = index::run(&args.index, config)?;

    let template = args
        .app
        .template
        .clone()
        .unwrap_or_else(|| config.apps.template.clone());
    let context = template_context(&args.index, &args.app, config);

    tracing::info!("Creating local app {}", args.index.space_name);
    // The app directory already holds the indexes
    let app_dir = create_app(&template, &context, &config.apps.apps_dir, true)?;

    Ok(CreateSpaceResponse {
        index,
        app_dir: app_dir.display().to_string(),
        template: template.display().to_string(),
    })
}

/// Variables handed to the template
pub fn template_context(index: &IndexArgs, app: &AppArgs, config: &Config) -> Context {
    let mut context = Context::new();
    context.insert("local_app".to_string(), json!(index.space_name));
    context.insert("dataset_name".to_string(), json!(index.dataset.dataset));
    context.insert("dataset_split".to_string(), json!(index.dataset.split));
    context.insert(
        "dset_text_field".to_string(),
        json!(index.dataset.columns().join(" ")),
    );
    context.insert("sdk".to_string(), json!(config.apps.sdk));
    context.insert(
        "results_per_page".to_string(),
        json!(config.search.page_size),
    );
    if let Some(title) = &app.space_title {
        context.insert("space_title".to_string(), json!(title));
    }
    if let Some(description) = &app.description {
        context.insert("space_description".to_string(), json!(description));
    }
    context
}
