//! Search over built indexes.
//!
//! Three strategies share one `search(query, limit)` contract:
//!
//! - **sparse**: BM25 over the Tantivy index
//! - **dense**: inner product over precomputed embeddings
//! - **hybrid**: fusion of both
//!
//! Which one is built depends only on which indexes are configured.

pub mod dense;
pub mod hybrid;
pub mod pager;
pub mod sparse;

pub use dense::{encode_corpus, DenseSearcher, Encoder, EncoderSpec, HashingEncoder};
pub use hybrid::{fuse, FusionParams, HybridSearcher};
pub use pager::{num_pages, page, result_page};
pub use sparse::SparseSearcher;

use crate::core::error::{Result, SpaceriniError};
use crate::core::types::SearchHit;
use std::path::PathBuf;

/// Indexes and encoder available to a searcher
#[derive(Debug, Clone, Default)]
pub struct SearcherConfig {
    pub sparse_index: Option<PathBuf>,
    pub dense_index: Option<PathBuf>,
    /// Query encoder; required with a dense index
    pub encoder: Option<EncoderSpec>,
    pub fusion: FusionParams,
}

/// Searcher variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearcherKind {
    Sparse,
    Dense,
    Hybrid,
}

impl SearcherKind {
    /// Pick the variant for a configuration
    pub fn select(config: &SearcherConfig) -> Result<Self> {
        let kind = match (&config.sparse_index, &config.dense_index) {
            (Some(_), None) => SearcherKind::Sparse,
            (None, Some(_)) => SearcherKind::Dense,
            (Some(_), Some(_)) => SearcherKind::Hybrid,
            (None, None) => {
                return Err(SpaceriniError::ConfigError(
                    "A sparse or dense index path is required".to_string(),
                ))
            }
        };

        if kind != SearcherKind::Sparse && config.encoder.is_none() {
            return Err(SpaceriniError::ConfigError(
                "A dense index requires a query encoder".to_string(),
            ));
        }
        Ok(kind)
    }
}

/// A sparse, dense or hybrid searcher
#[derive(Debug)]
pub enum Searcher {
    Sparse(SparseSearcher),
    Dense(DenseSearcher),
    Hybrid(HybridSearcher),
}

impl Searcher {
    /// Build the searcher the configuration calls for
    pub fn open(config: &SearcherConfig) -> Result<Self> {
        let kind = SearcherKind::select(config)?;
        tracing::debug!("Opening {:?} searcher", kind);

        let sparse = || -> Result<SparseSearcher> {
            match &config.sparse_index {
                Some(path) => SparseSearcher::open(path),
                None => Err(SpaceriniError::ConfigError(
                    "Sparse index path missing".to_string(),
                )),
            }
        };
        let dense = || -> Result<DenseSearcher> {
            match (&config.dense_index, &config.encoder) {
                (Some(path), Some(spec)) => DenseSearcher::open(path, spec.build()?),
                _ => Err(SpaceriniError::ConfigError(
                    "Dense index path or encoder missing".to_string(),
                )),
            }
        };

        Ok(match kind {
            SearcherKind::Sparse => Searcher::Sparse(sparse()?),
            SearcherKind::Dense => Searcher::Dense(dense()?),
            SearcherKind::Hybrid => {
                Searcher::Hybrid(HybridSearcher::new(sparse()?, dense()?, config.fusion))
            }
        })
    }

    pub fn kind(&self) -> SearcherKind {
        match self {
            Searcher::Sparse(_) => SearcherKind::Sparse,
            Searcher::Dense(_) => SearcherKind::Dense,
            Searcher::Hybrid(_) => SearcherKind::Hybrid,
        }
    }

    /// Ranked hits, best first
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        match self {
            Searcher::Sparse(s) => s.search(query, limit),
            Searcher::Dense(s) => s.search(query, limit),
            Searcher::Hybrid(s) => s.search(query, limit),
        }
    }
}

/// Dataset row indices of the top `k` hits
///
/// Only meaningful for indexes whose ids are row ordinals.
pub fn result_indices(searcher: &Searcher, query: &str, k: usize) -> Result<Vec<usize>> {
    searcher
        .search(query, k)?
        .into_iter()
        .map(|hit| {
            hit.docid.parse::<usize>().map_err(|_| {
                SpaceriniError::ConfigError(format!(
                    "Document id '{}' is not a row index",
                    hit.docid
                ))
            })
        })
        .collect()
}
