//! Where dataset rows come from.

use crate::core::config::HubConfig;
use crate::core::dataset::{load_local, stream_local, Dataset, HubRowStream, RowIter};
use crate::core::error::Result;
use std::path::{Path, PathBuf};

/// A dataset that can be read as a one-pass row stream
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Rows already in memory
    InMemory(Dataset),

    /// Local JSON / JSON lines / CSV / TSV file
    Local(PathBuf),

    /// Dataset hosted on the hub, streamed through the datasets-server
    Hub {
        name: String,
        config: Option<String>,
        split: String,
    },
}

impl DatasetSource {
    /// Pick a local file when `name_or_path` exists on disk, a hub
    /// dataset otherwise
    pub fn resolve(name_or_path: &str, split: &str, config: Option<&str>) -> Self {
        let path = Path::new(name_or_path);
        if path.is_file() {
            tracing::debug!("Using local dataset file {}", path.display());
            return Self::Local(path.to_path_buf());
        }

        Self::Hub {
            name: name_or_path.to_string(),
            config: config.map(str::to_string),
            split: split.to_string(),
        }
    }

    /// Short human-readable label
    pub fn describe(&self) -> String {
        match self {
            Self::InMemory(ds) => format!("in-memory dataset ({} rows)", ds.len()),
            Self::Local(path) => path.display().to_string(),
            Self::Hub { name, split, .. } => format!("{name} [{split}]"),
        }
    }

    /// Open the source as a row iterator
    pub fn rows(self, hub: &HubConfig) -> Result<RowIter> {
        match self {
            Self::InMemory(ds) => Ok(ds.into_row_iter()),
            Self::Local(path) => stream_local(&path),
            Self::Hub {
                name,
                config,
                split,
            } => {
                let stream = HubRowStream::open(
                    &hub.datasets_server,
                    hub.token.as_deref(),
                    &name,
                    config.as_deref(),
                    &split,
                )?;
                Ok(Box::new(stream))
            }
        }
    }

    /// Materialize the whole source in memory
    pub fn load(self, hub: &HubConfig) -> Result<Dataset> {
        match self {
            Self::InMemory(ds) => Ok(ds),
            Self::Local(path) => load_local(&path),
            other => Dataset::collect_rows(other.rows(hub)?),
        }
    }
}
