// BM25 search over a Tantivy index

use super::movie_indexes;
use crate::common::{build_sparse_index, fixtures::row, test_options};
use serde_json::json;
use spacerini::core::dataset::Dataset;
use spacerini::core::index::{index_stream, TantivyEngine};
use spacerini::core::search::{
    FusionParams, Searcher, SearcherConfig, SearcherKind, SparseSearcher,
};
use tempfile::TempDir;

#[test]
fn test_best_match_ranks_first_with_stored_contents() {
    let rows = vec![
        row(json!({"text": "the weather is mild today"})),
        row(json!({"text": "rust borrow checker explained"})),
        row(json!({"text": "a borrow is a loan"})),
    ];
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");
    build_sparse_index(&Dataset::from_rows(rows), "text", &index);

    let hits = SparseSearcher::open(&index)
        .unwrap()
        .search("borrow checker", 10)
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].docid, "1");
    assert_eq!(
        hits[0].contents.as_deref(),
        Some("rust borrow checker explained")
    );
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn test_contents_absent_without_store_contents() {
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("idx");
    let options = spacerini::core::index::IndexerOptions {
        store_contents: false,
        ..test_options(&index)
    };
    index_stream(
        &TantivyEngine,
        Dataset::from_rows(vec![row(json!({"text": "only document"}))]).into_row_iter(),
        &["text".to_string()],
        None,
        &options,
    )
    .unwrap();

    let hits = SparseSearcher::open(&index)
        .unwrap()
        .search("document", 1)
        .unwrap();
    assert_eq!(hits[0].docid, "0");
    assert!(hits[0].contents.is_none());
}

#[test]
fn test_stemmed_query_matches_inflected_text() {
    let indexes = movie_indexes();
    let hits = SparseSearcher::open(&indexes.sparse)
        .unwrap()
        .search("battle", 3)
        .unwrap();
    assert_eq!(hits[0].docid, "3");
}

#[test]
fn test_limit_caps_results() {
    let indexes = movie_indexes();
    let hits = SparseSearcher::open(&indexes.sparse)
        .unwrap()
        .search("great movie", 1)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].docid, "0");
}

#[test]
fn test_zero_limit_returns_nothing() {
    let indexes = movie_indexes();
    let sparse = SparseSearcher::open(&indexes.sparse).unwrap();
    assert!(sparse.search("great movie", 0).unwrap().is_empty());

    // Dense and hybrid agree at the boundary
    let hybrid = Searcher::open(&SearcherConfig {
        sparse_index: Some(indexes.sparse.clone()),
        dense_index: Some(indexes.dense.clone()),
        encoder: Some(indexes.spec.clone()),
        fusion: FusionParams::default(),
    })
    .unwrap();
    assert!(hybrid.search("great movie", 0).unwrap().is_empty());
}

#[test]
fn test_stray_syntax_does_not_fail() {
    let indexes = movie_indexes();
    let searcher = SparseSearcher::open(&indexes.sparse).unwrap();
    assert!(searcher.search("\"great movie:", 5).is_ok());
}

#[test]
fn test_empty_query_rejected() {
    let indexes = movie_indexes();
    let searcher = SparseSearcher::open(&indexes.sparse).unwrap();
    assert!(searcher.search("   ", 5).is_err());
}

#[test]
fn test_sparse_only_config_selects_sparse() {
    let indexes = movie_indexes();
    let config = SearcherConfig {
        sparse_index: Some(indexes.sparse.clone()),
        ..Default::default()
    };

    let searcher = Searcher::open(&config).unwrap();
    assert_eq!(searcher.kind(), SearcherKind::Sparse);
    assert_eq!(searcher.search("farm", 3).unwrap()[0].docid, "4");
}
