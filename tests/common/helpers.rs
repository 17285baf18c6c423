// Test helper functions

use spacerini::core::dataset::Dataset;
use spacerini::core::index::{index_stream, IndexerOptions, TantivyEngine, Threads};
use std::path::Path;

/// Indexer options sized for tests: one thread, small buffer, contents stored
#[allow(dead_code)] // Used in integration tests
pub fn test_options(index: &Path) -> IndexerOptions {
    IndexerOptions {
        threads: Threads::Fixed(1),
        memory_buffer: "64".to_string(),
        store_contents: true,
        ..IndexerOptions::new(index)
    }
}

/// Index `column` of `dataset` into `index` with row ordinals as ids
#[allow(dead_code)] // Used in integration tests
pub fn build_sparse_index(dataset: &Dataset, column: &str, index: &Path) -> u64 {
    index_stream(
        &TantivyEngine,
        dataset.clone().into_row_iter(),
        &[column.to_string()],
        None,
        &test_options(index),
    )
    .expect("Failed to index dataset")
}
