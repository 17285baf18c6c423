//! Dataset sharding.
//!
//! A dataset is reduced to its text column, renamed `contents`, given a
//! sequential `id`, and written as `docs-NNN.jsonl` files. The number of
//! shards follows from the table size and a byte budget; rows are split
//! into contiguous groups whose sizes differ by at most one.

pub mod size;

pub use size::ByteSize;

use crate::core::dataset::Dataset;
use crate::core::error::{Result, SpaceriniError};
use crate::core::types::{value_to_text, ShardRecord};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Bytes accounted for each `id` value
const ID_WIDTH: u64 = 8;

/// Options for one sharding run
#[derive(Debug, Clone)]
pub struct ShardOptions {
    /// Column holding the text to index
    pub text_column: String,

    /// Target size of one shard
    pub shard_size: ByteSize,

    /// Directory receiving the shard files (created if absent)
    pub output_dir: PathBuf,
}

/// What a sharding run produced
#[derive(Debug, Clone)]
pub struct ShardSummary {
    pub rows: usize,
    pub total_bytes: u64,
    pub files: Vec<PathBuf>,
}

impl ShardSummary {
    pub fn num_shards(&self) -> usize {
        self.files.len()
    }
}

/// Shard a dataset with a size expression as the budget
pub fn shard(
    dataset: &Dataset,
    shard_size: &str,
    output_dir: &Path,
    text_column: &str,
) -> Result<ShardSummary> {
    let options = ShardOptions {
        text_column: text_column.to_string(),
        shard_size: ByteSize::parse(shard_size)?,
        output_dir: output_dir.to_path_buf(),
    };
    shard_dataset(dataset, &options)
}

/// Shard a dataset into JSON-lines files
pub fn shard_dataset(dataset: &Dataset, options: &ShardOptions) -> Result<ShardSummary> {
    // Any pre-existing `contents` / `id` columns are replaced.
    // A dataset without rows or columns (an empty file) has no schema to check.
    let contents: Vec<String> = if dataset.is_empty() && dataset.columns().is_empty() {
        Vec::new()
    } else {
        dataset
            .column_values(&options.text_column)?
            .into_iter()
            .map(value_to_text)
            .collect()
    };

    let total_bytes: u64 = contents
        .iter()
        .map(|text| text.len() as u64 + ID_WIDTH)
        .sum();
    let num_shards = shard_count(total_bytes, options.shard_size);

    tracing::info!(
        "Sharding {} rows ({} bytes) into {} shard(s) of at most {}",
        contents.len(),
        total_bytes,
        num_shards,
        options.shard_size
    );

    fs::create_dir_all(&options.output_dir)?;

    let mut files = Vec::with_capacity(num_shards);
    for (index, range) in plan_shards(contents.len(), num_shards)
        .into_iter()
        .enumerate()
    {
        let path = options.output_dir.join(shard_file_name(index));
        write_shard(&path, &contents, range)?;
        files.push(path);
    }

    Ok(ShardSummary {
        rows: contents.len(),
        total_bytes,
        files,
    })
}

/// `max(1, floor(total / budget) + 1)`
pub fn shard_count(total_bytes: u64, budget: ByteSize) -> usize {
    let count = total_bytes / budget.as_u64() + 1;
    usize::try_from(count).unwrap_or(usize::MAX).max(1)
}

/// Contiguous row ranges for `num_shards` shards
///
/// The first `rows % num_shards` shards hold one extra row.
pub fn plan_shards(rows: usize, num_shards: usize) -> Vec<Range<usize>> {
    let num_shards = num_shards.max(1);
    let div = rows / num_shards;
    let rem = rows % num_shards;

    (0..num_shards)
        .map(|i| {
            let start = div * i + i.min(rem);
            let len = div + usize::from(i < rem);
            start..start + len
        })
        .collect()
}

/// File name of the shard at `index`
pub fn shard_file_name(index: usize) -> String {
    format!("docs-{index:03}.jsonl")
}

fn write_shard(path: &Path, contents: &[String], range: Range<usize>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for id in range {
        let record = ShardRecord {
            contents: contents[id].clone(),
            id: id as u64,
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::debug!("Wrote shard {}", path.display());
    Ok(())
}

/// List shard-like files (`*.json`, `*.jsonl`) in a directory, sorted by name
pub fn list_shards(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SpaceriniError::ConfigError(format!(
            "Shard directory {} does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("json") | Some("jsonl")
                )
        })
        .collect();
    files.sort();
    Ok(files)
}
