//! Core library logic, independent of the command line.
//!
//! - **config**: configuration loading (TOML + environment)
//! - **error**: error types and Result alias
//! - **types**: shared records (shards, documents, hits, stats)
//! - **xdg**: XDG directory handling
//! - **dataset**: local and hub dataset sources
//! - **shard**: byte-size sharding into JSON lines
//! - **index**: flag marshaling, engine boundary, streaming indexing
//! - **search**: sparse, dense and hybrid searchers, result paging
//! - **scaffold**: template rendering for apps
//! - **publish**: hub repositories, uploads and downloads

pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod publish;
pub mod scaffold;
pub mod search;
pub mod shard;
pub mod types;
pub mod xdg;

pub use config::Config;
pub use error::{Result, SpaceriniError};
