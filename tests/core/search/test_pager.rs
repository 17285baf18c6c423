// Paging ranked results onto dataset rows

use crate::common::movie_rows;
use spacerini::core::dataset::Dataset;
use spacerini::core::error::SpaceriniError;
use spacerini::core::search::{num_pages, page, result_page};

#[test]
fn test_result_page_returns_rows_in_rank_order() {
    let dataset = Dataset::from_rows(movie_rows());
    let ranked = [5, 2, 0, 3];

    let second = result_page(&dataset, &ranked, 1, 2).unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second.rows()[0]["rid"], "r0");
    assert_eq!(second.rows()[1]["rid"], "r3");
}

#[test]
fn test_last_partial_page() {
    let ranked: Vec<usize> = (0..5).collect();
    assert_eq!(num_pages(ranked.len(), 2), 3);
    assert_eq!(page(&ranked, 2, 2).unwrap(), &[4]);
}

#[test]
fn test_page_past_end_is_out_of_range() {
    let ranked = [1, 2];
    assert!(matches!(
        page(&ranked, 1, 2),
        Err(SpaceriniError::PageOutOfRange {
            page: 1,
            num_pages: 1
        })
    ));
}

#[test]
fn test_out_of_bounds_row_index_fails() {
    let dataset = Dataset::from_rows(movie_rows());
    assert!(result_page(&dataset, &[0, 42], 0, 10).is_err());
}
