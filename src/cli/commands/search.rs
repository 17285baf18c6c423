//! Search command - query an app's indexes

use crate::cli::commands::{dense_index_dir, sparse_index_dir};
use crate::cli::output::{colors, truncate};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::dataset::DatasetSource;
use crate::core::search::{
    num_pages, page, result_indices, result_page, EncoderSpec, FusionParams, Searcher,
    SearcherConfig,
};
use crate::core::types::Row;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Search the indexes of this app
    #[arg(long, short = 's')]
    pub space_name: Option<String>,

    /// Sparse (BM25) index directory
    #[arg(long)]
    pub sparse_index: Option<PathBuf>,

    /// Dense (embedding) index directory
    #[arg(long)]
    pub dense_index: Option<PathBuf>,

    /// Number of results to retrieve; defaults to [search].default_k
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Zero-based results page
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Results per page; defaults to [search].page_size
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Sparse weight in hybrid fusion; defaults to [search].hybrid_alpha
    #[arg(long)]
    pub alpha: Option<f32>,

    /// Normalize scores before fusion
    #[arg(long)]
    pub normalize: bool,

    /// Apply alpha to the dense score instead of the sparse one
    #[arg(long)]
    pub weight_on_dense: bool,

    /// Show result rows from this dataset (ids must be row ordinals)
    #[arg(long)]
    pub dataset: Option<String>,

    /// Split of --dataset
    #[arg(long, default_value = "train")]
    pub split: String,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    pub docid: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub searcher: String,
    pub total_results: usize,
    pub page: usize,
    pub num_pages: usize,
    pub results: Vec<SearchResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
}

/// Indexes to search: explicit paths win over the app's directories
pub fn searcher_config(args: &SearchArgs, config: &Config) -> crate::core::Result<SearcherConfig> {
    let from_app = |dir: PathBuf| dir.exists().then_some(dir);
    let sparse_index = args.sparse_index.clone().or_else(|| {
        args.space_name
            .as_deref()
            .and_then(|name| from_app(sparse_index_dir(config, name)))
    });
    let dense_index = args.dense_index.clone().or_else(|| {
        args.space_name
            .as_deref()
            .and_then(|name| from_app(dense_index_dir(config, name)))
    });

    let encoder = match &dense_index {
        Some(dir) => Some(EncoderSpec::load(dir)?),
        None => None,
    };

    Ok(SearcherConfig {
        sparse_index,
        dense_index,
        encoder,
        fusion: FusionParams {
            alpha: args.alpha.unwrap_or(config.search.hybrid_alpha),
            normalize: args.normalize,
            weight_on_dense: args.weight_on_dense,
        },
    })
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let searcher = Searcher::open(&searcher_config(&args, config)?)?;
    let limit = args
        .limit
        .unwrap_or(config.search.default_k)
        .clamp(1, config.search.max_k);
    let per_page = args.page_size.unwrap_or(config.search.page_size);

    let hits = searcher.search(&args.query, limit)?;
    let page_hits = page(&hits, args.page, per_page)?;
    let first_rank = args.page * per_page + 1;

    let rows = match &args.dataset {
        Some(name) => {
            let dataset = DatasetSource::resolve(name, &args.split, None).load(&config.hub)?;
            let ids = result_indices(&searcher, &args.query, limit)?;
            Some(result_page(&dataset, &ids, args.page, per_page)?.into_rows())
        }
        None => None,
    };

    let output = SearchResponseOutput {
        query: args.query.clone(),
        searcher: format!("{:?}", searcher.kind()).to_lowercase(),
        total_results: hits.len(),
        page: args.page,
        num_pages: num_pages(hits.len(), per_page),
        results: page_hits
            .iter()
            .enumerate()
            .map(|(i, hit)| SearchResultItem {
                rank: first_rank + i,
                docid: hit.docid.clone(),
                score: hit.score,
                contents: hit.contents.clone(),
            })
            .collect(),
        rows,
    };

    match format {
        OutputFormat::Human => print_human(&output),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_human(output: &SearchResponseOutput) {
    if output.results.is_empty() {
        println!("No results found for '{}'", colors::label(&output.query));
        return;
    }

    println!(
        "Found {} result(s) with the {} searcher (page {} of {}):\n",
        colors::number(&output.total_results.to_string()),
        output.searcher,
        output.page + 1,
        output.num_pages
    );

    for (i, result) in output.results.iter().enumerate() {
        println!(
            "[{}] {} {}",
            colors::rank(&result.rank.to_string()),
            colors::name(&result.docid),
            colors::score(&format!("(score: {:.3})", result.score))
        );
        let text = output
            .rows
            .as_ref()
            .and_then(|rows| rows.get(i))
            .and_then(|row| serde_json::to_string(row).ok())
            .or_else(|| result.contents.clone());
        if let Some(text) = text {
            println!("    {}", colors::dim(&truncate(&text, 100)));
        }
        println!();
    }
}
