// Index statistics

use crate::common::{build_sparse_index, fixtures::row};
use serde_json::json;
use spacerini::core::dataset::Dataset;
use spacerini::core::index::fetch_index_stats;
use tempfile::TempDir;

#[test]
fn test_stats_of_small_index() {
    let rows = vec![
        row(json!({"text": "red apple"})),
        row(json!({"text": "green apple pie"})),
    ];
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");
    build_sparse_index(&Dataset::from_rows(rows), "text", &index);

    let stats = fetch_index_stats(&index).unwrap();

    assert_eq!(stats.documents, 2);
    assert_eq!(stats.total_terms, 5);
    // red, apple, green, pie
    assert_eq!(stats.unique_terms, 4);
}

#[test]
fn test_stats_of_missing_index_fails() {
    let dir = TempDir::new().unwrap();
    assert!(fetch_index_stats(&dir.path().join("missing")).is_err());
}
