//! Indexing: flag marshaling, the engine boundary, the streaming
//! adapter and index statistics.
//!
//! - **args**: [`IndexerOptions`] and [`build_args`]
//! - **engine**: [`IndexEngine`] / [`DocumentIndexer`] and the Tantivy engine
//! - **stream**: [`index_stream`] and [`index_json_shards`]
//! - **stats**: [`fetch_index_stats`]

pub mod args;
pub mod engine;
pub mod stats;
pub mod stream;

pub use args::{build_args, IndexerOptions, Threads};
pub use engine::{
    language_for, open_index, AnalyzerSettings, DocumentIndexer, EngineArgs, IndexEngine,
    TantivyEngine, TantivyIndexer, SUPPORTED_LANGUAGES,
};
pub use stats::fetch_index_stats;
pub use stream::{index_json_shards, index_stream};
