//! Local folder traversal for uploads.
//!
//! Walks a directory, skipping hidden directories and anything matching
//! an ignore pattern, and maps each file to its path in the repository.

use glob::Pattern;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, SpaceriniError};

/// Patterns ignored by default when uploading a folder
///
/// `shards/` holds intermediate JSON lines kept next to an app's indexes.
pub const DEFAULT_IGNORE: &[&str] = &[
    "**/__pycache__/**",
    "**/*.pyc",
    "**/.DS_Store",
    "shards/**",
];

/// A file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub local_path: PathBuf,
    /// Forward-slash path relative to the repository root
    pub path_in_repo: String,
    pub size: u64,
}

/// Directory walker with ignore patterns
pub struct FolderWalker {
    ignore_patterns: Vec<Pattern>,
}

impl FolderWalker {
    /// Create a walker
    ///
    /// # Arguments
    ///
    /// * `ignore_patterns` - Glob patterns, matched against paths
    ///   relative to the folder root
    pub fn new<S: AsRef<str>>(ignore_patterns: &[S]) -> Result<Self> {
        let ignore = ignore_patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| {
                    SpaceriniError::ConfigError(format!("Invalid ignore pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ignore_patterns: ignore,
        })
    }

    /// Walker with [`DEFAULT_IGNORE`]
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_IGNORE)
    }

    /// All files under `root`, sorted by repository path
    ///
    /// `path_in_repo` prefixes every repository path (e.g. `index`).
    pub fn collect(&self, root: &Path, path_in_repo: Option<&str>) -> Result<Vec<LocalFile>> {
        if !root.is_dir() {
            return Err(SpaceriniError::ConfigError(format!(
                "Folder {} does not exist",
                root.display()
            )));
        }

        let prefix = path_in_repo
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty());

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden_dir(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = to_repo_path(relative);
            if self.is_ignored(&relative) {
                tracing::debug!("Skipping ignored file: {}", relative);
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(LocalFile {
                local_path: entry.path().to_path_buf(),
                path_in_repo: match prefix {
                    Some(prefix) => format!("{prefix}/{relative}"),
                    None => relative,
                },
                size,
            });
        }

        files.sort_by(|a, b| a.path_in_repo.cmp(&b.path_in_repo));
        Ok(files)
    }

    fn is_ignored(&self, relative: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|p| p.matches(relative) || p.matches(&format!("/{relative}")))
    }
}

fn is_hidden_dir(entry: &DirEntry, root: &Path) -> bool {
    entry.path() != root
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// `base` joined with a relative path that stays inside it
///
/// `None` when `relative` is absolute or has a `..` component.
pub fn join_relative(base: &Path, relative: impl AsRef<Path>) -> Option<PathBuf> {
    let relative = relative.as_ref();
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    contained.then(|| base.join(relative))
}

fn to_repo_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
