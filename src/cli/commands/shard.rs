//! Shard command - split a dataset into JSON-lines files

use crate::cli::output::{colors, format_bytes};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::dataset::DatasetSource;
use crate::core::shard::shard;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the shard command
#[derive(Args, Debug)]
pub struct ShardArgs {
    /// Local dataset file (.json, .jsonl, .csv, .tsv) or hub dataset name
    pub dataset: String,

    /// Column holding the text to index
    #[arg(long, short = 'c')]
    pub column: String,

    /// Directory receiving the shards
    #[arg(long, short = 'o')]
    pub output_dir: PathBuf,

    /// Target shard size (e.g. 10MB, 512KiB); defaults to [sharding].shard_size
    #[arg(long)]
    pub shard_size: Option<String>,

    /// Hub dataset split
    #[arg(long, default_value = "train")]
    pub split: String,

    /// Hub dataset config (discovered when omitted)
    #[arg(long)]
    pub dataset_config: Option<String>,
}

/// Sharding result
#[derive(Debug, Serialize)]
pub struct ShardResponse {
    pub dataset: String,
    pub output_dir: String,
    pub rows: usize,
    pub total_bytes: u64,
    pub shards: Vec<String>,
}

/// Execute the shard command
pub fn execute(
    args: ShardArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = DatasetSource::resolve(&args.dataset, &args.split, args.dataset_config.as_deref());
    let label = source.describe();
    let dataset = source.load(&config.hub)?;

    let shard_size = args
        .shard_size
        .as_deref()
        .unwrap_or(&config.sharding.shard_size);
    let summary = shard(&dataset, shard_size, &args.output_dir, &args.column)?;

    let response = ShardResponse {
        dataset: label,
        output_dir: args.output_dir.display().to_string(),
        rows: summary.rows,
        total_bytes: summary.total_bytes,
        shards: summary
            .files
            .iter()
            .map(|f| f.display().to_string())
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "Sharded {} rows ({}) from {} into {} file(s):",
                colors::number(&response.rows.to_string()),
                format_bytes(response.total_bytes),
                colors::name(&response.dataset),
                colors::number(&response.shards.len().to_string())
            );
            for file in &response.shards {
                println!("  {}", colors::file_path(file));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
