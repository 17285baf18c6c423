//! Core data types shared across spacerini.
//!
//! Rows, the records handed to the indexing engine, and the values
//! returned by index statistics and search calls.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single dataset row: column name to JSON value
pub type Row = Map<String, Value>;

/// One line of a shard file
///
/// Field order is part of the shard format: `contents` first, then `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRecord {
    pub contents: String,
    pub id: u64,
}

/// The unit handed to the indexing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Designated id column value, or the row ordinal
    pub id: Value,

    /// Space-joined text of the indexed columns
    pub contents: String,
}

impl DocumentRecord {
    /// Id rendered the way the engine stores it
    pub fn id_string(&self) -> String {
        value_to_text(&self.id)
    }
}

/// Statistics reported for an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of live documents
    pub documents: u64,

    /// Total number of tokens in the `contents` field
    pub total_terms: u64,

    /// Number of distinct terms in the `contents` field
    pub unique_terms: u64,
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document identifier as stored in the index
    pub docid: String,

    /// Relevance score (higher = more relevant)
    pub score: f32,

    /// Stored document text, when the index keeps it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

/// Render a JSON value as plain text
///
/// Strings are used as-is, `null` becomes empty, everything else
/// falls back to its JSON text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
