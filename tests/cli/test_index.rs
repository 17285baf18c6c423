//! Tests for the index and create-space commands

use super::test_helpers::{cli_test_config, index_args, parse};
use crate::common::TestDataset;
use spacerini::cli::commands::{create_space, index};
use spacerini::cli::Commands;
use spacerini::core::index::fetch_index_stats;
use spacerini::core::publish::FolderWalker;
use std::fs;

#[test]
fn test_index_local_dataset_into_app_dir() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let args = index_args(&["--space-name", "movies", "--dataset", &data.path_str()]);

    let response = index::run(&args, &config).unwrap();

    assert_eq!(response.documents, 6);
    assert!(!response.copied);
    assert!(response.dense_index.is_none());
    let sparse = config.apps.apps_dir.join("movies/sparse_index");
    assert_eq!(response.sparse_index, sparse.display().to_string());
    assert_eq!(fetch_index_stats(&sparse).unwrap().documents, 6);
}

#[test]
fn test_existing_index_requires_force() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let args = index_args(&["--space-name", "movies", "--dataset", &data.path_str()]);
    index::run(&args, &config).unwrap();

    let again = index::run(&args, &config);
    assert!(again.unwrap_err().to_string().contains("--force"));

    let forced = index_args(&[
        "--space-name",
        "movies",
        "--dataset",
        &data.path_str(),
        "--force",
    ]);
    assert_eq!(index::run(&forced, &config).unwrap().documents, 6);
}

#[test]
fn test_index_exists_copies_index() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let first = index_args(&["--space-name", "a", "--dataset", &data.path_str()]);
    let built = index::run(&first, &config).unwrap();

    let copy = index_args(&[
        "--space-name",
        "b",
        "--dataset",
        &data.path_str(),
        "--index-exists",
        &built.sparse_index,
    ]);
    let response = index::run(&copy, &config).unwrap();

    assert!(response.copied);
    assert_eq!(response.documents, 6);
    assert!(config.apps.apps_dir.join("b/sparse_index").is_dir());
}

#[test]
fn test_encoder_dimension_builds_dense_index() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let args = index_args(&[
        "--space-name",
        "movies",
        "--dataset",
        &data.path_str(),
        "--encoder-dimension",
        "64",
    ]);

    let response = index::run(&args, &config).unwrap();

    assert_eq!(response.documents, 6);
    let dense = config.apps.apps_dir.join("movies/dense_index");
    assert_eq!(response.dense_index, Some(dense.display().to_string()));
    assert!(dense.join("embeddings.jsonl").exists());
    assert!(!config.apps.apps_dir.join("movies/shards").exists());
}

#[test]
fn test_kept_shards_stay_out_of_the_upload_set() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let args = index_args(&[
        "--space-name",
        "movies",
        "--dataset",
        &data.path_str(),
        "--encoder-dimension",
        "64",
        "--keep-shards",
    ]);

    index::run(&args, &config).unwrap();

    let app = config.apps.apps_dir.join("movies");
    assert!(app.join("shards").is_dir());
    let files = FolderWalker::with_defaults()
        .unwrap()
        .collect(&app, None)
        .unwrap();
    assert!(!files.is_empty());
    assert!(files.iter().all(|f| !f.path_in_repo.starts_with("shards/")));
    assert!(files
        .iter()
        .any(|f| f.path_in_repo.starts_with("sparse_index/")));
}

#[test]
fn test_encoder_dimension_rejects_extra_columns() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let args = index_args(&[
        "--space-name",
        "movies",
        "--dataset",
        &data.path_str(),
        "--encoder-dimension",
        "64",
        "--docid-column",
        "rid",
    ]);
    assert!(index::run(&args, &config).is_err());
}

#[test]
fn test_create_space_renders_app_next_to_index() {
    let (config, _temp) = cli_test_config();
    let data = TestDataset::movies();
    let dataset = data.path_str();
    let args = match parse(&[
        "create-space",
        "--space-name",
        "movies",
        "--dataset",
        &dataset,
        "--space-title",
        "Movie search",
    ]) {
        Commands::CreateSpace(args) => args,
        other => panic!("expected create-space, got {other:?}"),
    };

    let response = create_space::run(&args, &config).unwrap();

    let app = config.apps.apps_dir.join("movies");
    assert_eq!(response.app_dir, app.display().to_string());
    assert!(app.join("sparse_index").is_dir());
    assert!(app.join("app.py").exists());
    let readme = fs::read_to_string(app.join("README.md")).unwrap();
    assert!(readme.contains("title: Movie search"));
}
