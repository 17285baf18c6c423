//! Deploying apps and indexes to the hub.
//!
//! Each call creates the repository, uploads, then optionally deletes
//! the local copy. A failed step leaves earlier steps in place.

use crate::core::error::{Result, SpaceriniError};
use crate::core::publish::hub::{CreateRepo, HubClient, RepoType};
use crate::core::publish::identity::{repo_id, IdentityResolver};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory an index occupies inside its dataset repository
pub const INDEX_PATH_IN_REPO: &str = "index";

/// How to create a space
#[derive(Debug, Clone)]
pub struct SpaceOptions {
    /// Repository name, without namespace
    pub space_slug: String,
    /// `gradio` or `streamlit`
    pub sdk: String,
    pub private: bool,
    /// Remove the local app directory after a successful upload
    pub delete_after_push: bool,
}

impl SpaceOptions {
    pub fn new(space_slug: impl Into<String>, sdk: impl Into<String>) -> Self {
        Self {
            space_slug: space_slug.into(),
            sdk: sdk.into(),
            private: false,
            delete_after_push: false,
        }
    }
}

/// Create a space and upload `local_dir` into it; returns the space URL
pub fn create_space_from_local(
    client: &HubClient,
    identity: &dyn IdentityResolver,
    local_dir: &Path,
    options: &SpaceOptions,
) -> Result<String> {
    if !local_dir.is_dir() {
        return Err(SpaceriniError::ConfigError(format!(
            "App directory {} does not exist",
            local_dir.display()
        )));
    }

    let repo_id = repo_id(identity, &options.space_slug)?;
    let url = client.create_repo(&CreateRepo {
        repo_id: &repo_id,
        repo_type: RepoType::Space,
        private: options.private,
        space_sdk: Some(&options.sdk),
        exist_ok: false,
    })?;

    client.upload_folder(local_dir, &repo_id, RepoType::Space, None, "Create Space")?;
    delete_local(local_dir, options.delete_after_push)?;
    Ok(url)
}

/// Push an index as a dataset repository; returns the dataset URL
pub fn push_index_to_hub(
    client: &HubClient,
    identity: &dyn IdentityResolver,
    dataset_slug: &str,
    index_path: &Path,
    private: bool,
    delete_after_push: bool,
) -> Result<String> {
    if !index_path.is_dir() {
        return Err(SpaceriniError::ConfigError(format!(
            "Index path {} does not exist",
            index_path.display()
        )));
    }

    let repo_id = repo_id(identity, dataset_slug)?;
    let url = client.create_repo(&CreateRepo {
        repo_id: &repo_id,
        repo_type: RepoType::Dataset,
        private,
        space_sdk: None,
        exist_ok: false,
    })?;

    client.upload_folder(
        index_path,
        &repo_id,
        RepoType::Dataset,
        Some(INDEX_PATH_IN_REPO),
        "Upload index",
    )?;
    delete_local(index_path, delete_after_push)?;
    Ok(url)
}

/// Download a pushed index into `cache_dir`; returns the local index path
pub fn load_index_from_hub(
    client: &HubClient,
    identity: &dyn IdentityResolver,
    dataset_slug: &str,
    cache_dir: &Path,
) -> Result<PathBuf> {
    let repo_id = repo_id(identity, dataset_slug)?;
    let local = snapshot_dir(cache_dir, RepoType::Dataset, &repo_id);

    client.download_folder(
        &repo_id,
        RepoType::Dataset,
        Some(INDEX_PATH_IN_REPO),
        &local,
    )?;
    Ok(local.join(INDEX_PATH_IN_REPO))
}

/// Cache location of a repository snapshot: `<cache>/datasets--org--name`
pub fn snapshot_dir(cache_dir: &Path, repo_type: RepoType, repo_id: &str) -> PathBuf {
    cache_dir.join(format!(
        "{}--{}",
        repo_type.api_segment(),
        repo_id.replace('/', "--")
    ))
}

fn delete_local(path: &Path, delete: bool) -> Result<()> {
    if delete {
        fs::remove_dir_all(path)?;
        tracing::info!("Deleted local copy at {}", path.display());
    }
    Ok(())
}
