//! Paging of ranked results.

use crate::core::dataset::Dataset;
use crate::core::error::{Result, SpaceriniError};

/// Number of addressable pages
///
/// An empty list still has one (empty) page; a list whose length is a
/// multiple of `per_page` has no trailing empty page.
pub fn num_pages(len: usize, per_page: usize) -> usize {
    if len == 0 {
        1
    } else {
        len.div_ceil(per_page.max(1))
    }
}

/// Zero-based page `page` of `ids`
pub fn page<T>(ids: &[T], page: usize, per_page: usize) -> Result<&[T]> {
    if per_page == 0 {
        return Err(SpaceriniError::ConfigError(
            "Results per page must be non-zero".to_string(),
        ));
    }

    let pages = num_pages(ids.len(), per_page);
    if page >= pages {
        return Err(SpaceriniError::PageOutOfRange {
            page,
            num_pages: pages,
        });
    }

    let start = page * per_page;
    let end = (start + per_page).min(ids.len());
    Ok(&ids[start..end])
}

/// Rows of `dataset` on one page of ranked row indices, in rank order
pub fn result_page(
    dataset: &Dataset,
    ranked: &[usize],
    page_index: usize,
    per_page: usize,
) -> Result<Dataset> {
    dataset.select(page(ranked, page_index, per_page)?)
}
