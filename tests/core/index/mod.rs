// Indexing integration tests against the Tantivy engine

mod test_collection;
mod test_stats;
mod test_stream;
