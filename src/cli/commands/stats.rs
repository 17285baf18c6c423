//! Stats command - show index statistics

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::index::fetch_index_stats;
use crate::core::types::IndexStats;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Index directory
    pub index_path: PathBuf,
}

/// Statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub index_path: String,
    #[serde(flatten)]
    pub stats: IndexStats,
}

/// Execute the stats command
pub fn execute(args: StatsArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let stats = fetch_index_stats(&args.index_path)?;
    let response = StatsResponse {
        index_path: args.index_path.display().to_string(),
        stats,
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label(&response.index_path));
            println!(
                "  documents:    {}",
                colors::number(&response.stats.documents.to_string())
            );
            println!(
                "  total_terms:  {}",
                colors::number(&response.stats.total_terms.to_string())
            );
            println!(
                "  unique_terms: {}",
                colors::number(&response.stats.unique_terms.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
