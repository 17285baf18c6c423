// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{movie_rows, TestDataset};
#[allow(unused_imports)]
pub use helpers::{build_sparse_index, test_options};
