//! Tests for the search and stats commands

use super::test_helpers::{cli_test_config, index_args, search_args};
use crate::common::TestDataset;
use spacerini::cli::commands::{index, search, stats, StatsArgs};
use spacerini::cli::OutputFormat;
use spacerini::core::search::{Searcher, SearcherKind};

#[test]
fn test_searcher_config_uses_app_indexes() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    index::run(
        &index_args(&["--space-name", "movies", "--dataset", &data.path_str()]),
        &config,
    )
    .unwrap();

    let args = search_args(&["lasers", "--space-name", "movies"]);
    let searcher_config = search::searcher_config(&args, &config).unwrap();

    assert_eq!(
        searcher_config.sparse_index,
        Some(config.apps.apps_dir.join("movies/sparse_index"))
    );
    assert!(searcher_config.dense_index.is_none());

    let searcher = Searcher::open(&searcher_config).unwrap();
    assert_eq!(searcher.kind(), SearcherKind::Sparse);
    assert_eq!(searcher.search("lasers", 3).unwrap()[0].docid, "3");
}

#[test]
fn test_dense_app_selects_hybrid() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    index::run(
        &index_args(&[
            "--space-name",
            "movies",
            "--dataset",
            &data.path_str(),
            "--encoder-dimension",
            "128",
        ]),
        &config,
    )
    .unwrap();

    let args = search_args(&["heroic pilot", "-s", "movies", "--alpha", "0.3"]);
    let searcher_config = search::searcher_config(&args, &config).unwrap();

    assert_eq!(searcher_config.fusion.alpha, 0.3);
    let searcher = Searcher::open(&searcher_config).unwrap();
    assert_eq!(searcher.kind(), SearcherKind::Hybrid);
}

#[test]
fn test_unknown_app_has_no_index() {
    let (config, _temp) = cli_test_config();
    let args = search_args(&["anything", "-s", "nope"]);

    let searcher_config = search::searcher_config(&args, &config).unwrap();
    assert!(Searcher::open(&searcher_config).is_err());
}

#[test]
fn test_search_command_with_dataset_rows() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    index::run(
        &index_args(&["--space-name", "movies", "--dataset", &data.path_str()]),
        &config,
    )
    .unwrap();

    let args = search_args(&[
        "great",
        "-s",
        "movies",
        "--page-size",
        "1",
        "--dataset",
        &data.path_str(),
    ]);
    assert!(search::execute(args, &config, OutputFormat::Json).is_ok());
}

#[test]
fn test_search_page_out_of_range_fails() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    index::run(
        &index_args(&["--space-name", "movies", "--dataset", &data.path_str()]),
        &config,
    )
    .unwrap();

    let args = search_args(&["farm", "-s", "movies", "--page", "5"]);
    assert!(search::execute(args, &config, OutputFormat::Human).is_err());
}

#[test]
fn test_stats_command() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let built = index::run(
        &index_args(&["--space-name", "movies", "--dataset", &data.path_str()]),
        &config,
    )
    .unwrap();

    let args = StatsArgs {
        index_path: built.sparse_index.into(),
    };
    assert!(stats::execute(args, OutputFormat::Json).is_ok());

    let missing = StatsArgs {
        index_path: config.apps.apps_dir.join("missing"),
    };
    assert!(stats::execute(missing, OutputFormat::Human).is_err());
}
