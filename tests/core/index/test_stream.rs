// Row-stream indexing through the engine flag list

use crate::common::{build_sparse_index, fixtures::row, movie_rows, test_options};
use serde_json::json;
use spacerini::core::dataset::Dataset;
use spacerini::core::index::{index_stream, TantivyEngine};
use spacerini::core::search::SparseSearcher;
use tempfile::TempDir;

#[test]
fn test_index_stream_adds_every_row() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("sparse_index");

    let added = build_sparse_index(&dataset, "text", &index);

    assert_eq!(added, dataset.len() as u64);
    let searcher = SparseSearcher::open(&index).unwrap();
    assert_eq!(searcher.num_docs(), dataset.len() as u64);
}

#[test]
fn test_row_ordinals_are_default_ids() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");
    build_sparse_index(&dataset, "text", &index);

    let hits = SparseSearcher::open(&index)
        .unwrap()
        .search("lasers", 5)
        .unwrap();
    assert_eq!(hits[0].docid, "3");
}

#[test]
fn test_docid_column_sets_ids() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");

    index_stream(
        &TantivyEngine,
        dataset.into_row_iter(),
        &["text".to_string()],
        Some("rid"),
        &test_options(&index),
    )
    .unwrap();

    let hits = SparseSearcher::open(&index)
        .unwrap()
        .search("farm", 5)
        .unwrap();
    assert_eq!(hits[0].docid, "r4");
}

#[test]
fn test_multiple_columns_are_joined() {
    let rows = vec![
        row(json!({"title": "Dune", "plot": "sand worms on a desert planet"})),
        row(json!({"title": "Alien", "plot": "a creature aboard a ship"})),
    ];
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");

    index_stream(
        &TantivyEngine,
        Dataset::from_rows(rows).into_row_iter(),
        &["title".to_string(), "plot".to_string()],
        None,
        &test_options(&index),
    )
    .unwrap();

    let searcher = SparseSearcher::open(&index).unwrap();
    let by_title = searcher.search("dune", 5).unwrap();
    assert_eq!(by_title[0].docid, "0");
    assert_eq!(
        by_title[0].contents.as_deref(),
        Some("Dune sand worms on a desert planet")
    );
    assert_eq!(searcher.search("creature", 5).unwrap()[0].docid, "1");
}

#[test]
fn test_missing_column_aborts_indexing() {
    let rows = vec![
        row(json!({"text": "first"})),
        row(json!({"other": "second"})),
    ];
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");

    let result = index_stream(
        &TantivyEngine,
        Dataset::from_rows(rows).into_row_iter(),
        &["text".to_string()],
        None,
        &test_options(&index),
    );
    assert!(result.is_err());
}

#[test]
fn test_existing_index_is_rejected() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");
    build_sparse_index(&dataset, "text", &index);

    let again = index_stream(
        &TantivyEngine,
        dataset.into_row_iter(),
        &["text".to_string()],
        None,
        &test_options(&index),
    );
    assert!(again.is_err());
}

#[test]
fn test_empty_column_list_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = index_stream(
        &TantivyEngine,
        Dataset::from_rows(movie_rows()).into_row_iter(),
        &[],
        None,
        &test_options(&dir.path().join("idx")),
    );
    assert!(result.is_err());
}
