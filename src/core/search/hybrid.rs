//! Fusion of sparse and dense results.
//!
//! Both searchers are asked for a candidate list. A document missing from
//! one list takes that list's minimum score. The fused score is
//! `alpha * sparse + dense`, or `sparse + alpha * dense` when the weight
//! sits on the dense side.

use crate::core::error::Result;
use crate::core::search::dense::DenseSearcher;
use crate::core::search::sparse::SparseSearcher;
use crate::core::types::SearchHit;
use std::collections::HashMap;

/// Minimum number of candidates fetched from each side
const MIN_CANDIDATES: usize = 10;

/// How scores are combined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
    pub alpha: f32,
    /// Centre each list on its min/max midpoint and scale by its range
    pub normalize: bool,
    pub weight_on_dense: bool,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            normalize: false,
            weight_on_dense: false,
        }
    }
}

/// Sparse + dense searcher
#[derive(Debug)]
pub struct HybridSearcher {
    sparse: SparseSearcher,
    dense: DenseSearcher,
    params: FusionParams,
}

impl HybridSearcher {
    pub fn new(sparse: SparseSearcher, dense: DenseSearcher, params: FusionParams) -> Self {
        Self {
            sparse,
            dense,
            params,
        }
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let depth = limit.max(MIN_CANDIDATES);
        let sparse = self.sparse.search(query, depth)?;
        let dense = self.dense.search(query, depth)?;
        Ok(fuse(&sparse, &dense, &self.params, limit))
    }
}

#[derive(Debug, Clone, Copy)]
struct Range {
    min: f32,
    max: f32,
}

impl Range {
    fn of(hits: &[SearchHit]) -> Self {
        if hits.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        hits.iter().fold(
            Self {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |r, h| Self {
                min: r.min.min(h.score),
                max: r.max.max(h.score),
            },
        )
    }

    fn normalize(&self, score: f32) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (score - (self.min + self.max) / 2.0) / span
        }
    }
}

/// Fuse two ranked lists into the top `limit` hits
pub fn fuse(
    sparse: &[SearchHit],
    dense: &[SearchHit],
    params: &FusionParams,
    limit: usize,
) -> Vec<SearchHit> {
    let sparse_range = Range::of(sparse);
    let dense_range = Range::of(dense);

    let sparse_scores: HashMap<&str, &SearchHit> =
        sparse.iter().map(|h| (h.docid.as_str(), h)).collect();
    let dense_scores: HashMap<&str, &SearchHit> =
        dense.iter().map(|h| (h.docid.as_str(), h)).collect();

    // Sparse order first, then dense-only documents, so ties stay stable
    let mut docids: Vec<&str> = sparse.iter().map(|h| h.docid.as_str()).collect();
    docids.extend(
        dense
            .iter()
            .map(|h| h.docid.as_str())
            .filter(|id| !sparse_scores.contains_key(id)),
    );

    let mut fused: Vec<SearchHit> = docids
        .into_iter()
        .map(|docid| {
            let mut s = sparse_scores
                .get(docid)
                .map_or(sparse_range.min, |h| h.score);
            let mut d = dense_scores.get(docid).map_or(dense_range.min, |h| h.score);
            if params.normalize {
                s = sparse_range.normalize(s);
                d = dense_range.normalize(d);
            }

            let score = if params.weight_on_dense {
                s + params.alpha * d
            } else {
                params.alpha * s + d
            };
            let contents = sparse_scores
                .get(docid)
                .and_then(|h| h.contents.clone())
                .or_else(|| dense_scores.get(docid).and_then(|h| h.contents.clone()));

            SearchHit {
                docid: docid.to_string(),
                score,
                contents,
            }
        })
        .collect();

    fused.sort_by(|a, b| b.score.total_cmp(&a.score));
    fused.truncate(limit);
    fused
}
