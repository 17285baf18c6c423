//! Sharding integration tests

use crate::common::{fixtures::row, movie_rows, TestDataset};
use serde_json::{json, Value};
use spacerini::core::dataset::{load_local, Dataset};
use spacerini::core::error::SpaceriniError;
use spacerini::core::shard::{list_shards, shard};
use std::fs;
use tempfile::TempDir;

/// Every shard line, in shard order
fn read_lines(files: &[std::path::PathBuf]) -> Vec<Value> {
    files
        .iter()
        .flat_map(|f| {
            fs::read_to_string(f)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str::<Value>(l).unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_three_rows_fit_in_one_shard() {
    let rows = movie_rows().into_iter().take(3).collect();
    let dataset = Dataset::from_rows(rows);
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "10MB", out.path(), "text").unwrap();

    assert_eq!(summary.num_shards(), 1);
    assert_eq!(summary.rows, 3);
    let lines = read_lines(&summary.files);
    let ids: Vec<u64> = lines.iter().map(|l| l["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(lines.iter().all(|l| l.as_object().unwrap().len() == 2));
}

#[test]
fn test_existing_id_column_is_replaced_by_ordinals() {
    let dataset = Dataset::from_rows(vec![
        row(json!({"id": "doc1", "contents": "contents of doc one."})),
        row(json!({"id": "doc2", "contents": "two"})),
        row(json!({"id": "doc3", "contents": "three"})),
    ]);
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "1MB", out.path(), "contents").unwrap();

    assert_eq!(summary.num_shards(), 1);
    let lines = read_lines(&summary.files);
    assert_eq!(
        lines,
        vec![
            json!({"contents": "contents of doc one.", "id": 0}),
            json!({"contents": "two", "id": 1}),
            json!({"contents": "three", "id": 2}),
        ]
    );
}

#[test]
fn test_shards_concatenate_to_source_order() {
    let dataset = Dataset::from_rows(movie_rows());
    let out = TempDir::new().unwrap();

    // Small budget forces several shards
    let summary = shard(&dataset, "100B", out.path(), "text").unwrap();
    assert!(summary.num_shards() > 1);

    let lines = read_lines(&summary.files);
    assert_eq!(lines.len(), dataset.len());
    for (i, (line, source)) in lines.iter().zip(dataset.rows()).enumerate() {
        assert_eq!(line["id"].as_u64().unwrap(), i as u64);
        assert_eq!(line["contents"], source["text"]);
    }
}

#[test]
fn test_shard_sizes_differ_by_at_most_one_row() {
    let dataset = Dataset::from_rows(movie_rows());
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "150B", out.path(), "text").unwrap();
    let counts: Vec<usize> = summary
        .files
        .iter()
        .map(|f| fs::read_to_string(f).unwrap().lines().count())
        .collect();

    let max = counts.iter().max().unwrap();
    let min = counts.iter().min().unwrap();
    assert!(max - min <= 1, "uneven shards: {counts:?}");
    assert_eq!(counts.iter().sum::<usize>(), dataset.len());
}

#[test]
fn test_listed_shards_match_written_files() {
    let dataset = Dataset::from_rows(movie_rows());
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "100B", out.path(), "text").unwrap();
    assert_eq!(list_shards(out.path()).unwrap(), summary.files);
}

#[test]
fn test_shard_local_jsonl_file() {
    let data = TestDataset::movies();
    let dataset = load_local(&data.path).unwrap();
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "1MB", out.path(), "text").unwrap();
    assert_eq!(summary.rows, data.rows.len());
}

#[test]
fn test_missing_column_fails() {
    let dataset = Dataset::from_rows(movie_rows());
    let out = TempDir::new().unwrap();

    let err = shard(&dataset, "1MB", out.path(), "body").unwrap_err();
    assert!(matches!(err, SpaceriniError::ConfigError(_)), "{err:?}");
    assert!(list_shards(out.path()).map_or(true, |files| files.is_empty()));
}

#[test]
fn test_bad_size_expression_fails() {
    let dataset = Dataset::from_rows(movie_rows());
    let out = TempDir::new().unwrap();

    let err = shard(&dataset, "ten megabytes", out.path(), "text").unwrap_err();
    assert!(matches!(err, SpaceriniError::SizeParse(_)), "{err:?}");
}

#[test]
fn test_empty_file_writes_one_empty_shard() {
    let data = TestDataset::with_rows("empty.jsonl", Vec::new());
    let dataset = load_local(&data.path).unwrap();
    let out = TempDir::new().unwrap();

    let summary = shard(&dataset, "10MB", out.path(), "text").unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.num_shards(), 1);
    assert_eq!(summary.files[0], out.path().join("docs-000.jsonl"));
    assert_eq!(fs::read_to_string(&summary.files[0]).unwrap(), "");
}
