//! BM25 search over a Tantivy index.
//!
//! Queries go through the same analyzer the index was built with, so a
//! French index stems French queries. Tantivy's BM25 parameters are
//! fixed (k1 = 1.2, b = 0.75).

use crate::core::error::{Result, SpaceriniError};
use crate::core::index::open_index;
use crate::core::types::SearchHit;
use std::path::{Path, PathBuf};
use tantivy::{
    collector::TopDocs,
    query::QueryParser,
    schema::{Field, Value},
    Index, IndexReader, TantivyDocument,
};

/// BM25 searcher
pub struct SparseSearcher {
    path: PathBuf,
    index: Index,
    reader: IndexReader,
    id_field: Field,
    contents_field: Field,
}

impl std::fmt::Debug for SparseSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseSearcher")
            .field("path", &self.path)
            .finish()
    }
}

impl SparseSearcher {
    /// Open the index at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let index = open_index(path)?;
        let schema = index.schema();

        let id_field = schema.get_field("id")?;
        let contents_field = schema.get_field("contents")?;
        let reader = index.reader()?;

        Ok(Self {
            path: path.to_path_buf(),
            index,
            reader,
            id_field,
            contents_field,
        })
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Top `limit` documents for `query`, best first
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(SpaceriniError::ConfigError(
                "Query cannot be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let parser = QueryParser::for_index(&self.index, vec![self.contents_field]);
        // Free-text queries: a stray quote or colon should not fail the search
        let (parsed, errors) = parser.parse_query_lenient(query);
        if !errors.is_empty() {
            tracing::debug!("Lenient query parse of {:?}: {:?}", query, errors);
        }

        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(SearchHit {
                docid: Self::extract_text(&doc, self.id_field).unwrap_or_default(),
                score,
                contents: Self::extract_text(&doc, self.contents_field),
            });
        }

        tracing::debug!(
            "Sparse search {:?} returned {} hits from {}",
            query,
            hits.len(),
            self.path.display()
        );
        Ok(hits)
    }

    fn extract_text(doc: &TantivyDocument, field: Field) -> Option<String> {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}
