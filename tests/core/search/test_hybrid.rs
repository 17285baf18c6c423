// Fusion of sparse and dense rankings

use super::movie_indexes;
use spacerini::core::search::{
    result_indices, FusionParams, Searcher, SearcherConfig, SearcherKind,
};

fn hybrid(params: FusionParams) -> (super::MovieIndexes, Searcher) {
    let indexes = movie_indexes();
    let config = SearcherConfig {
        sparse_index: Some(indexes.sparse.clone()),
        dense_index: Some(indexes.dense.clone()),
        encoder: Some(indexes.spec.clone()),
        fusion: params,
    };
    let searcher = Searcher::open(&config).unwrap();
    (indexes, searcher)
}

#[test]
fn test_both_indexes_select_hybrid() {
    let (_indexes, searcher) = hybrid(FusionParams::default());
    assert_eq!(searcher.kind(), SearcherKind::Hybrid);
}

#[test]
fn test_hybrid_agrees_on_clear_winner() {
    let (_indexes, searcher) = hybrid(FusionParams::default());
    let hits = searcher.search("lasers heroic pilot", 3).unwrap();

    assert!(hits.len() <= 3);
    assert_eq!(hits[0].docid, "3");
    assert!(hits[0].contents.is_some());
}

#[test]
fn test_normalized_fusion_is_sorted() {
    let (_indexes, searcher) = hybrid(FusionParams {
        alpha: 0.5,
        normalize: true,
        weight_on_dense: true,
    });
    let hits = searcher.search("great movie", 5).unwrap();

    assert!(!hits.is_empty());
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_result_indices_are_row_ordinals() {
    let (_indexes, searcher) = hybrid(FusionParams::default());
    let ids = result_indices(&searcher, "quiet family farm", 2).unwrap();
    assert_eq!(ids[0], 4);
}
