//! Publishing apps and indexes to the hub.
//!
//! - **identity**: who owns created repositories
//! - **folder**: which local files get uploaded
//! - **hub**: blocking REST client (repos, uploads, downloads)
//! - **space**: create-and-upload flows for spaces and indexes

pub mod folder;
pub mod hub;
pub mod identity;
pub mod space;

pub use folder::{join_relative, FolderWalker, LocalFile};
pub use hub::{CreateRepo, HubClient, RepoType, UploadMode};
pub use identity::{repo_id, IdentityResolver, StaticNamespace};
pub use space::{
    create_space_from_local, load_index_from_hub, push_index_to_hub, SpaceOptions,
    INDEX_PATH_IN_REPO,
};
