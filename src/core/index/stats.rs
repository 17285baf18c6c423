//! Index statistics.

use crate::core::error::{Result, SpaceriniError};
use crate::core::types::IndexStats;
use std::collections::HashSet;
use std::path::Path;
use tantivy::Index;

/// Document count, token count and distinct term count of `contents`
pub fn fetch_index_stats(index_path: &Path) -> Result<IndexStats> {
    if !index_path.exists() {
        return Err(SpaceriniError::ConfigError(format!(
            "Index path {} does not exist",
            index_path.display()
        )));
    }

    let index = Index::open_in_dir(index_path)?;
    let contents = index.schema().get_field("contents")?;
    let reader = index.reader()?;
    let searcher = reader.searcher();

    let mut total_terms = 0u64;
    let mut unique = HashSet::new();
    for segment in searcher.segment_readers() {
        let inverted = segment.inverted_index(contents)?;
        total_terms += inverted.total_num_tokens();

        let mut terms = inverted.terms().stream()?;
        while terms.advance() {
            unique.insert(terms.key().to_vec());
        }
    }

    Ok(IndexStats {
        documents: searcher.num_docs(),
        total_terms,
        unique_terms: unique.len() as u64,
    })
}
