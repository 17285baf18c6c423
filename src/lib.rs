//! Spacerini - search demo apps over datasets
//!
//! Turns a dataset into a hosted search app: shard it into JSON lines,
//! index it with Tantivy through an Anserini-style flag list, search it
//! (BM25, dense or hybrid), render an app template around the index and
//! publish the app and index to the hub.
//!
//! # Architecture
//!
//! - **core**: library logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - dataset (local files, hub streaming)
//!   - shard (byte-size sharding)
//!   - index (flag marshaling, engine boundary, streaming indexer)
//!   - search (sparse, dense, hybrid, pager)
//!   - scaffold (template rendering)
//!   - publish (hub repositories and uploads)
//!
//! - **cli**: clap adapter (depends on core)
//!
//! Control flow is synchronous; the only concurrency is inside the
//! indexing engine, sized by `-threads`.

// Library logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::dataset::{Dataset, DatasetSource};
pub use crate::core::error::{Result, SpaceriniError};
pub use crate::core::index::{build_args, index_stream, IndexerOptions, TantivyEngine};
pub use crate::core::search::{Searcher, SearcherConfig, SearcherKind};
pub use crate::core::shard::shard;
pub use crate::core::types::*;
