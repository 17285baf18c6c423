// Inner-product search over hashed embeddings

use super::movie_indexes;
use spacerini::core::search::{DenseSearcher, EncoderSpec, Searcher, SearcherConfig, SearcherKind};

#[test]
fn test_dense_index_holds_every_document() {
    let indexes = movie_indexes();
    let searcher = DenseSearcher::open(&indexes.dense, indexes.spec.build().unwrap()).unwrap();
    assert_eq!(searcher.len(), 6);
}

#[test]
fn test_encoder_description_is_saved() {
    let indexes = movie_indexes();
    assert_eq!(EncoderSpec::load(&indexes.dense).unwrap(), indexes.spec);
}

#[test]
fn test_dense_search_ranks_shared_tokens_first() {
    let indexes = movie_indexes();
    let config = SearcherConfig {
        dense_index: Some(indexes.dense.clone()),
        encoder: Some(indexes.spec.clone()),
        ..Default::default()
    };

    let searcher = Searcher::open(&config).unwrap();
    assert_eq!(searcher.kind(), SearcherKind::Dense);

    let hits = searcher.search("lasers heroic pilot", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].docid, "3");
    assert!(hits[0].contents.as_deref().unwrap().contains("lasers"));
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_dimension_mismatch_fails() {
    let indexes = movie_indexes();
    let wrong = EncoderSpec::Hashing { dimension: 8 };
    assert!(DenseSearcher::open(&indexes.dense, wrong.build().unwrap()).is_err());
}

#[test]
fn test_dense_without_encoder_fails() {
    let indexes = movie_indexes();
    let config = SearcherConfig {
        dense_index: Some(indexes.dense.clone()),
        ..Default::default()
    };
    assert!(Searcher::open(&config).is_err());
}
