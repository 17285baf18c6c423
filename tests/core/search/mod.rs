// Search integration tests: sparse, dense, hybrid and paging

mod test_dense;
mod test_hybrid;
mod test_pager;
mod test_sparse;

use crate::common::{movie_rows, test_options};
use spacerini::core::dataset::Dataset;
use spacerini::core::index::{index_json_shards, TantivyEngine};
use spacerini::core::search::{encode_corpus, EncoderSpec};
use spacerini::core::shard::shard;
use std::path::PathBuf;
use tempfile::TempDir;

/// Sparse and dense indexes over the movie corpus, ids are row ordinals
pub struct MovieIndexes {
    pub _dir: TempDir,
    pub sparse: PathBuf,
    pub dense: PathBuf,
    pub spec: EncoderSpec,
}

pub fn movie_indexes() -> MovieIndexes {
    let dir = TempDir::new().unwrap();
    let shards = dir.path().join("shards");
    let sparse = dir.path().join("sparse_index");
    let dense = dir.path().join("dense_index");
    let spec = EncoderSpec::Hashing { dimension: 256 };

    shard(&Dataset::from_rows(movie_rows()), "1MB", &shards, "text").unwrap();
    index_json_shards(&TantivyEngine, &shards, &test_options(&sparse), true).unwrap();
    encode_corpus(&shards, &spec, &dense, 4).unwrap();

    MovieIndexes {
        _dir: dir,
        sparse,
        dense,
        spec,
    }
}
