//! Index command - index a dataset into an app directory

use crate::cli::commands::{app_dir, dense_index_dir, sparse_index_dir};
use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::dataset::DatasetSource;
use crate::core::index::{
    fetch_index_stats, index_json_shards, index_stream, IndexerOptions, TantivyEngine, Threads,
};
use crate::core::search::{encode_corpus, EncoderSpec};
use crate::core::shard::shard;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Which dataset to read and which columns become documents
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Local dataset file (.json, .jsonl, .csv, .tsv) or hub dataset name
    #[arg(long)]
    pub dataset: String,

    /// Hub dataset split
    #[arg(long, default_value = "train")]
    pub split: String,

    /// Hub dataset config (discovered when omitted)
    #[arg(long)]
    pub dataset_config: Option<String>,

    /// Column holding the document text
    #[arg(long, default_value = "text")]
    pub content_column: String,

    /// Further columns appended to the document text
    #[arg(long, num_args = 1..)]
    pub columns_to_index: Vec<String>,

    /// Column holding document ids (row ordinals when omitted)
    #[arg(long)]
    pub docid_column: Option<String>,
}

impl DatasetArgs {
    /// Content column first, then the extra columns
    pub fn columns(&self) -> Vec<String> {
        std::iter::once(self.content_column.clone())
            .chain(self.columns_to_index.iter().cloned())
            .collect()
    }

    pub fn source(&self) -> DatasetSource {
        DatasetSource::resolve(&self.dataset, &self.split, self.dataset_config.as_deref())
    }
}

/// Engine flags; unset values fall back to the `[indexing]` section
///
/// Boolean switches take an optional value, so `--store-contents=false`
/// turns off a switch the configuration enables.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexFlags {
    /// Indexing threads (number or "auto")
    #[arg(long)]
    pub threads: Option<Threads>,

    /// Indexing memory buffer in MB
    #[arg(long)]
    pub memory_buffer: Option<String>,

    /// ISO code of the dataset language
    #[arg(long)]
    pub language: Option<String>,

    /// Stemmer (porter or none)
    #[arg(long)]
    pub stemmer: Option<String>,

    /// File of extra stop words, one per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Hugging Face tokenizer to analyze with
    #[arg(long)]
    pub hf_tokenizer: Option<String>,

    /// Documents are already whitespace-tokenized
    #[arg(long)]
    pub pretokenized: bool,

    /// Store term positions
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub store_positions: Option<bool>,

    /// Store document vectors
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub store_docvectors: Option<bool>,

    /// Store document contents
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub store_contents: Option<bool>,

    /// Store raw documents
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub store_raw: Option<bool>,

    /// Keep stop words in the index
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub keep_stopwords: Option<bool>,

    /// Merge the index into one segment when done
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub optimize_index: Option<bool>,
}

impl IndexFlags {
    /// Indexer options for `index`, starting from configuration
    pub fn to_options(&self, config: &Config, index: &Path) -> IndexerOptions {
        let base = IndexerOptions::from_config(&config.indexing, index);
        IndexerOptions {
            threads: self.threads.unwrap_or(base.threads),
            memory_buffer: self.memory_buffer.clone().unwrap_or(base.memory_buffer.clone()),
            language: self.language.clone().or(base.language.clone()),
            stemmer: self.stemmer.clone().or(base.stemmer.clone()),
            stopwords: self.stopwords.clone(),
            analyze_with_hf_tokenizer: self.hf_tokenizer.clone(),
            pretokenized: self.pretokenized,
            store_positions: self.store_positions.unwrap_or(base.store_positions),
            store_docvectors: self.store_docvectors.unwrap_or(base.store_docvectors),
            store_contents: self.store_contents.unwrap_or(base.store_contents),
            store_raw: self.store_raw.unwrap_or(base.store_raw),
            keep_stopwords: self.keep_stopwords.unwrap_or(base.keep_stopwords),
            optimize: self.optimize_index.unwrap_or(base.optimize),
            ..base
        }
    }
}

/// Arguments for the index command
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// App name; indexes go to <apps_dir>/<space-name>/
    #[arg(long)]
    pub space_name: String,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub flags: IndexFlags,

    /// Copy this existing index instead of indexing
    #[arg(long)]
    pub index_exists: Option<PathBuf>,

    /// Also build a dense index with a hashing encoder of this dimension
    #[arg(long)]
    pub encoder_dimension: Option<usize>,

    /// Documents per encoding batch
    #[arg(long, default_value = "64")]
    pub batch_size: usize,

    /// Keep the intermediate shards of a dense build
    #[arg(long)]
    pub keep_shards: bool,

    /// Replace existing indexes of this app
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub space_name: String,
    pub dataset: String,
    pub sparse_index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dense_index: Option<String>,
    pub documents: u64,
    pub copied: bool,
    pub duration_secs: f64,
    pub indexed_at: DateTime<Utc>,
}

/// Execute the index command
pub fn execute(
    args: IndexArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = run(&args, config)?;
    print_response(&response, format)
}

/// Build (or copy) the indexes of an app
pub fn run(args: &IndexArgs, config: &Config) -> Result<IndexResponse, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let app = app_dir(config, &args.space_name);
    let sparse_dir = sparse_index_dir(config, &args.space_name);
    let dense_dir = dense_index_dir(config, &args.space_name);

    fs::create_dir_all(&app)?;
    if args.force {
        for dir in [&sparse_dir, &dense_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }
    } else if sparse_dir.exists() {
        return Err(format!(
            "Index '{}' already exists. Use --force to rebuild it.",
            sparse_dir.display()
        )
        .into());
    }

    let source = args.dataset.source();
    let label = source.describe();
    tracing::info!("Indexing {} into {}", label, app.display());

    let (documents, dense, copied) = if let Some(existing) = &args.index_exists {
        copy_dir(existing, &sparse_dir)?;
        (fetch_index_stats(&sparse_dir)?.documents, None, true)
    } else if let Some(dimension) = args.encoder_dimension {
        let documents = build_sparse_and_dense(args, config, dimension, &sparse_dir, &dense_dir)?;
        (documents, Some(dense_dir), false)
    } else {
        let options = args.flags.to_options(config, &sparse_dir);
        let rows = source.rows(&config.hub)?;
        let documents = index_stream(
            &TantivyEngine,
            rows,
            &args.dataset.columns(),
            args.dataset.docid_column.as_deref(),
            &options,
        )?;
        (documents, None, false)
    };

    Ok(IndexResponse {
        space_name: args.space_name.clone(),
        dataset: label,
        sparse_index: sparse_dir.display().to_string(),
        dense_index: dense.map(|d| d.display().to_string()),
        documents,
        copied,
        duration_secs: start.elapsed().as_secs_f64(),
        indexed_at: Utc::now(),
    })
}

/// Shard the dataset, then index the shards sparsely and densely
///
/// Shards carry the content column and row ordinals only.
fn build_sparse_and_dense(
    args: &IndexArgs,
    config: &Config,
    dimension: usize,
    sparse_dir: &Path,
    dense_dir: &Path,
) -> Result<u64, Box<dyn std::error::Error>> {
    if !args.dataset.columns_to_index.is_empty() || args.dataset.docid_column.is_some() {
        return Err(
            "--encoder-dimension indexes the content column with row ordinals; \
             drop --columns-to-index and --docid-column"
                .into(),
        );
    }

    let shards_dir = app_dir(config, &args.space_name).join("shards");
    let dataset = args.dataset.source().load(&config.hub)?;
    shard(
        &dataset,
        &config.sharding.shard_size,
        &shards_dir,
        &args.dataset.content_column,
    )?;

    let options = args.flags.to_options(config, sparse_dir);
    let documents = index_json_shards(&TantivyEngine, &shards_dir, &options, true)?;

    let spec = EncoderSpec::Hashing { dimension };
    encode_corpus(&shards_dir, &spec, dense_dir, args.batch_size)?;

    if !(args.keep_shards || config.sharding.keep_shards) {
        fs::remove_dir_all(&shards_dir)?;
    }
    Ok(documents)
}

/// Recursively copy a directory
fn copy_dir(from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !from.is_dir() {
        return Err(format!("No index found at {}", from.display()).into());
    }

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let target = to.join(entry.path().strip_prefix(from)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn print_response(
    response: &IndexResponse,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            let verb = if response.copied { "Copied" } else { "Indexed" };
            println!(
                "{} {} documents from {} for '{}'",
                verb,
                colors::number(&response.documents.to_string()),
                colors::name(&response.dataset),
                colors::name(&response.space_name)
            );
            println!("  Sparse index: {}", colors::file_path(&response.sparse_index));
            if let Some(dense) = &response.dense_index {
                println!("  Dense index:  {}", colors::file_path(dense));
            }
            println!("  Duration:     {}", format_duration(response.duration_secs));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }
    Ok(())
}
