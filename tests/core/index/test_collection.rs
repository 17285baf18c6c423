// Collection indexing from JSON-lines shards

use crate::common::{movie_rows, test_options};
use spacerini::core::dataset::Dataset;
use spacerini::core::index::{index_json_shards, TantivyEngine};
use spacerini::core::search::SparseSearcher;
use spacerini::core::shard::shard;
use tempfile::TempDir;

#[test]
fn test_index_shards_and_remove_them() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let shards = dir.path().join("shards");
    let index = dir.path().join("idx");
    shard(&dataset, "100B", &shards, "text").unwrap();

    let added = index_json_shards(&TantivyEngine, &shards, &test_options(&index), false).unwrap();

    assert_eq!(added, dataset.len() as u64);
    assert!(!shards.exists());

    let hits = SparseSearcher::open(&index)
        .unwrap()
        .search("soundtrack", 3)
        .unwrap();
    assert_eq!(hits[0].docid, "2");
}

#[test]
fn test_keep_shards_leaves_them_in_place() {
    let dataset = Dataset::from_rows(movie_rows());
    let dir = TempDir::new().unwrap();
    let shards = dir.path().join("shards");
    shard(&dataset, "1MB", &shards, "text").unwrap();

    index_json_shards(
        &TantivyEngine,
        &shards,
        &test_options(&dir.path().join("idx")),
        true,
    )
    .unwrap();

    assert!(shards.join("docs-000.jsonl").exists());
}

#[test]
fn test_missing_shard_dir_fails() {
    let dir = TempDir::new().unwrap();
    let result = index_json_shards(
        &TantivyEngine,
        &dir.path().join("nope"),
        &test_options(&dir.path().join("idx")),
        true,
    );
    assert!(result.is_err());
}
