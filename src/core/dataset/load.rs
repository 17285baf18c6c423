//! Local dataset files.
//!
//! The format is chosen by file extension. JSON lines and CSV/TSV are
//! streamed lazily; a `.json` file holding a top-level array is read
//! in one go.

use crate::core::dataset::{Dataset, RowIter};
use crate::core::error::{Result, SpaceriniError};
use crate::core::types::Row;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Supported local file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFormat {
    Json,
    JsonLines,
    Csv,
    Tsv,
}

impl LocalFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(SpaceriniError::ConfigError(format!(
                "Unsupported dataset file extension for {}: expected .json, .jsonl, .csv or .tsv",
                path.display()
            ))),
        }
    }
}

/// Load a local dataset file fully into memory
pub fn load_local(path: &Path) -> Result<Dataset> {
    let format = LocalFormat::from_path(path)?;
    if matches!(format, LocalFormat::Csv | LocalFormat::Tsv) {
        // Keep header order rather than first-seen key order
        let columns = csv_headers(path, format)?;
        let rows = stream_local(path)?.collect::<Result<Vec<_>>>()?;
        return Ok(Dataset::new(columns, rows));
    }
    Dataset::collect_rows(stream_local(path)?)
}

/// Open a local dataset file as a row iterator
pub fn stream_local(path: &Path) -> Result<RowIter> {
    match LocalFormat::from_path(path)? {
        LocalFormat::JsonLines => stream_json_lines(path),
        LocalFormat::Json => {
            let text = fs::read_to_string(path)?;
            if text.trim_start().starts_with('[') {
                let values: Vec<Value> = serde_json::from_str(&text)?;
                let rows = values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| into_row(v, i + 1, path))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(rows.into_iter().map(Ok)))
            } else {
                stream_json_lines(path)
            }
        }
        format @ (LocalFormat::Csv | LocalFormat::Tsv) => stream_delimited(path, format),
    }
}

fn stream_json_lines(path: &Path) -> Result<RowIter> {
    let reader = BufReader::new(File::open(path)?);
    let display = path.to_path_buf();

    let rows = reader
        .lines()
        .enumerate()
        .filter_map(move |(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<Value>(&line)
                    .map_err(SpaceriniError::from)
                    .and_then(|v| into_row(v, i + 1, &display)),
            ),
            Err(e) => Some(Err(SpaceriniError::from(e))),
        });

    Ok(Box::new(rows))
}

fn delimiter(format: LocalFormat) -> u8 {
    if format == LocalFormat::Tsv {
        b'\t'
    } else {
        b','
    }
}

fn csv_headers(path: &Path, format: LocalFormat) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter(format))
        .from_path(path)?;
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

fn stream_delimited(path: &Path, format: LocalFormat) -> Result<RowIter> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter(format))
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let rows = reader.into_records().map(move |record| -> Result<Row> {
        let record = record?;
        let mut row = Row::new();
        for (name, field) in headers.iter().zip(record.iter()) {
            row.insert(name.clone(), Value::String(field.to_string()));
        }
        Ok(row)
    });

    Ok(Box::new(rows))
}

fn into_row(value: Value, line: usize, path: &Path) -> Result<Row> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SpaceriniError::ConfigError(format!(
            "Record {line} in {} is not a JSON object: {other}",
            path.display()
        ))),
    }
}
