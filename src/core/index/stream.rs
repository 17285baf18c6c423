//! Row-by-row indexing.
//!
//! Rows are turned into `{"id", "contents"}` documents and handed to the
//! engine one at a time, in source order. The indexer is closed exactly
//! once whatever happens; the first error aborts the run and any partial
//! index is left on disk.

use crate::core::dataset::RowIter;
use crate::core::error::{Result, SpaceriniError};
use crate::core::index::{build_args, DocumentIndexer, IndexEngine, IndexerOptions};
use crate::core::types::{value_to_text, DocumentRecord, Row};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;

const PROGRESS_EVERY: u64 = 10_000;

/// Index a row stream
///
/// `contents` is the space-joined text of `columns`; `id` is the value of
/// `doc_id_column` when given, the row ordinal otherwise. Returns the
/// number of documents added.
pub fn index_stream<E: IndexEngine>(
    engine: &E,
    rows: RowIter,
    columns: &[String],
    doc_id_column: Option<&str>,
    options: &IndexerOptions,
) -> Result<u64> {
    if columns.is_empty() {
        return Err(SpaceriniError::ConfigError(
            "At least one column to index is required".to_string(),
        ));
    }

    let args = build_args(options);
    tracing::debug!("Engine arguments: {}", args.join(" "));

    let start = Instant::now();
    let mut indexer = engine.open(&args)?;
    let outcome = feed_rows(&mut indexer, rows, columns, doc_id_column);
    let closed = indexer.close();

    let added = outcome?;
    closed?;

    tracing::info!(
        "Indexed {} rows into {} in {:.1}s",
        added,
        options.index.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(added)
}

fn feed_rows<I: DocumentIndexer>(
    indexer: &mut I,
    rows: RowIter,
    columns: &[String],
    doc_id_column: Option<&str>,
) -> Result<u64> {
    let mut added = 0u64;
    for (ordinal, row) in rows.enumerate() {
        let record = to_record(&row?, ordinal, columns, doc_id_column)?;
        indexer.add(&serde_json::to_string(&record)?)?;
        added += 1;

        if added % PROGRESS_EVERY == 0 {
            tracing::info!("Indexed {} rows", added);
        }
    }
    Ok(added)
}

/// Map one row to a document record
pub fn to_record(
    row: &Row,
    ordinal: usize,
    columns: &[String],
    doc_id_column: Option<&str>,
) -> Result<DocumentRecord> {
    let lookup = |column: &str| {
        row.get(column).ok_or_else(|| {
            SpaceriniError::ConfigError(format!("Column '{column}' not found in row {ordinal}"))
        })
    };

    let parts = columns
        .iter()
        .map(|c| lookup(c.as_str()).map(value_to_text))
        .collect::<Result<Vec<_>>>()?;

    let id = match doc_id_column {
        Some(column) => lookup(column)?.clone(),
        None => Value::from(ordinal),
    };

    Ok(DocumentRecord {
        id,
        contents: parts.join(" "),
    })
}

/// Index a directory of JSON-lines shards through the engine's
/// collection entry point, removing the shards afterwards unless kept
pub fn index_json_shards<E: IndexEngine>(
    engine: &E,
    shards_dir: &Path,
    options: &IndexerOptions,
    keep_shards: bool,
) -> Result<u64> {
    let options = options.clone().with_input(shards_dir);
    let added = engine.index_collection(&build_args(&options))?;

    if !keep_shards {
        fs::remove_dir_all(shards_dir)?;
        tracing::debug!("Removed shards in {}", shards_dir.display());
    }
    Ok(added)
}
