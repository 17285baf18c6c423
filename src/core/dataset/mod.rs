//! Tabular datasets and the sources they are read from.
//!
//! A [`Dataset`] is an ordered list of rows with an ordered column list.
//! Rows come from an in-memory table, a local file (detected by
//! extension), or a hub dataset streamed page by page.
//!
//! # Sources
//!
//! - **load**: local JSON / JSON lines / CSV / TSV files
//! - **hub**: datasets-server `/rows` streaming
//! - **source**: [`DatasetSource`] resolution and row iteration

pub mod hub;
pub mod load;
pub mod source;

pub use hub::HubRowStream;
pub use load::{load_local, stream_local, LocalFormat};
pub use source::DatasetSource;

use crate::core::error::{Result, SpaceriniError};
use crate::core::types::Row;
use serde_json::Value;

/// One-pass row iterator
pub type RowIter = Box<dyn Iterator<Item = Result<Row>>>;

/// In-memory dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset with an explicit column order
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create a dataset, taking columns in the order they first appear
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Collect a row iterator into a dataset
    pub fn collect_rows(rows: RowIter) -> Result<Self> {
        let rows = rows.collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Values of one column, `null` where a row lacks it
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        if !self.has_column(name) {
            return Err(SpaceriniError::ConfigError(format!(
                "Column '{name}' not found (available: {})",
                self.columns.join(", ")
            )));
        }

        Ok(self
            .rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&Value::Null))
            .collect())
    }

    /// New dataset holding the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Result<Dataset> {
        let mut rows = Vec::with_capacity(indices.len());
        for &index in indices {
            let row = self.rows.get(index).ok_or(SpaceriniError::RowOutOfRange {
                row: index,
                len: self.rows.len(),
            })?;
            rows.push(row.clone());
        }

        Ok(Dataset {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Row iterator over an owned dataset
    pub fn into_row_iter(self) -> RowIter {
        Box::new(self.rows.into_iter().map(Ok))
    }
}
