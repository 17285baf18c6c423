// Test fixtures for integration testing

use serde_json::{json, Value};
use spacerini::core::types::Row;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small movie-review corpus; row `i` has `"rid": "r{i}"`
#[allow(dead_code)] // Used in integration tests
pub fn movie_rows() -> Vec<Row> {
    let texts = [
        "A great movie with a moving story and great acting",
        "Terrible plot, the actors looked bored",
        "The soundtrack was lovely but the movie dragged on",
        "Space battles, lasers and a heroic pilot",
        "A quiet drama about a family farm",
        "Great fun for kids, silly jokes everywhere",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| row(json!({ "rid": format!("r{i}"), "text": text, "stars": i + 1 })))
        .collect()
}

/// Convert a JSON object literal into a row
#[allow(dead_code)] // Used in integration tests
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture row must be an object, got {other}"),
    }
}

/// A dataset written to a local JSON-lines file
#[allow(dead_code)] // Used in integration tests
pub struct TestDataset {
    pub dir: TempDir,
    pub path: PathBuf,
    pub rows: Vec<Row>,
}

impl TestDataset {
    /// The movie corpus as `movies.jsonl`
    #[allow(dead_code)] // Used in integration tests
    pub fn movies() -> Self {
        Self::with_rows("movies.jsonl", movie_rows())
    }

    /// Arbitrary rows as a JSON-lines file named `name`
    #[allow(dead_code)] // Used in integration tests
    pub fn with_rows(name: &str, rows: Vec<Row>) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(name);
        let lines: Vec<String> = rows
            .iter()
            .map(|r| serde_json::to_string(r).expect("Failed to encode row"))
            .collect();
        std::fs::write(&path, lines.join("\n") + "\n").expect("Failed to write dataset");
        Self { dir, path, rows }
    }

    /// Path as the string the CLI expects
    #[allow(dead_code)] // Used in integration tests
    pub fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}
