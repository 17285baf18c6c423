//! Configuration management for spacerini.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, SpaceriniError};
use crate::core::index::Threads;
use crate::core::shard::ByteSize;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sharding: ShardingConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub apps: AppsConfig,
}

/// Sharding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShardingConfig {
    /// Target size of one shard file ("10MB", "512KiB", bytes)
    #[serde(default = "default_shard_size")]
    pub shard_size: String,

    /// Keep shard files once indexing has finished
    #[serde(default)]
    pub keep_shards: bool,
}

/// Indexing configuration, mirrored onto the engine flags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Indexing threads, a number or "auto"
    #[serde(default)]
    pub threads: Threads,

    /// Engine memory buffer in MB
    #[serde(default = "default_memory_buffer")]
    pub memory_buffer: String,

    /// ISO language code for stemming and stop words
    #[serde(default = "default_language")]
    pub language: Option<String>,

    #[serde(default)]
    pub stemmer: Option<String>,

    #[serde(default = "default_true")]
    pub store_positions: bool,

    #[serde(default)]
    pub store_docvectors: bool,

    #[serde(default = "default_true")]
    pub store_contents: bool,

    #[serde(default)]
    pub store_raw: bool,

    #[serde(default)]
    pub keep_stopwords: bool,

    /// Merge the index down to one segment after indexing
    #[serde(default)]
    pub optimize: bool,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Rows per result page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Weight of the sparse score in hybrid fusion
    #[serde(default = "default_hybrid_alpha")]
    pub hybrid_alpha: f32,
}

/// Hub endpoints and credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct HubConfig {
    #[serde(default = "default_hub_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_datasets_server")]
    pub datasets_server: String,

    /// Access token; never written back out
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

/// Generated application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppsConfig {
    /// Directory that receives scaffolded apps
    #[serde(default = "default_apps_dir")]
    pub apps_dir: PathBuf,

    /// Template used by `create-space`
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Space SDK declared when creating the repository
    #[serde(default = "default_sdk")]
    pub sdk: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_shard_size() -> String {
    "10MB".to_string()
}

fn default_memory_buffer() -> String {
    "4096".to_string()
}

fn default_language() -> Option<String> {
    Some("en".to_string())
}

fn default_k() -> usize {
    10
}

fn default_max_k() -> usize {
    100
}

fn default_page_size() -> usize {
    10
}

fn default_hybrid_alpha() -> f32 {
    0.1
}

fn default_hub_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_datasets_server() -> String {
    "https://datasets-server.huggingface.co".to_string()
}

fn default_apps_dir() -> PathBuf {
    PathBuf::from("apps")
}

fn default_template() -> PathBuf {
    PathBuf::from("templates/gradio")
}

fn default_sdk() -> String {
    "gradio".to_string()
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            shard_size: default_shard_size(),
            keep_shards: false,
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            threads: Threads::Auto,
            memory_buffer: default_memory_buffer(),
            language: default_language(),
            stemmer: None,
            store_positions: true,
            store_docvectors: false,
            store_contents: true,
            store_raw: false,
            keep_stopwords: false,
            optimize: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            page_size: default_page_size(),
            hybrid_alpha: default_hybrid_alpha(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_hub_endpoint(),
            datasets_server: default_datasets_server(),
            token: None,
        }
    }
}

impl std::fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubConfig")
            .field("endpoint", &self.endpoint)
            .field("datasets_server", &self.datasets_server)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AppsConfig {
    fn default() -> Self {
        Self {
            apps_dir: default_apps_dir(),
            template: default_template(),
            sdk: default_sdk(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SpaceriniError::ConfigError(format!("Failed to read config file: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load config, optionally from an explicit file
    ///
    /// Priority order:
    /// 1. SPACERINI_CONFIG env var
    /// 2. Explicit path (`--config-file`)
    /// 3. XDG config file (~/.config/spacerini/config.toml)
    /// 4. ./spacerini.toml
    /// 5. Defaults
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let xdg = XdgDirs::new();
        xdg.log_paths();

        let mut config = if let Ok(config_path) = env::var("SPACERINI_CONFIG") {
            Self::from_file(config_path)?
        } else if let Some(path) = explicit {
            Self::from_file(path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("spacerini.toml").exists() {
                Self::from_file("spacerini.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Sharding configuration
        if let Ok(size) = env::var("SPACERINI_SHARD_SIZE") {
            self.sharding.shard_size = size;
        }
        if let Ok(keep) = env::var("SPACERINI_KEEP_SHARDS") {
            if let Ok(k) = keep.parse() {
                self.sharding.keep_shards = k;
            }
        }

        // Indexing configuration
        if let Ok(threads) = env::var("SPACERINI_THREADS") {
            if let Ok(t) = threads.parse() {
                self.indexing.threads = t;
            }
        }
        if let Ok(buffer) = env::var("SPACERINI_MEMORY_BUFFER") {
            self.indexing.memory_buffer = buffer;
        }
        if let Ok(language) = env::var("SPACERINI_LANGUAGE") {
            self.indexing.language = if language.is_empty() {
                None
            } else {
                Some(language)
            };
        }

        // Search configuration
        if let Ok(default_k) = env::var("SPACERINI_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("SPACERINI_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.search.max_k = k;
            }
        }
        if let Ok(page_size) = env::var("SPACERINI_PAGE_SIZE") {
            if let Ok(p) = page_size.parse() {
                self.search.page_size = p;
            }
        }

        // Hub configuration
        if let Ok(endpoint) = env::var("SPACERINI_HUB_ENDPOINT") {
            self.hub.endpoint = endpoint;
        }
        if let Ok(server) = env::var("SPACERINI_DATASETS_SERVER") {
            self.hub.datasets_server = server;
        }
        if let Ok(token) = env::var("HF_TOKEN") {
            if !token.is_empty() {
                self.hub.token = Some(token);
            }
        }

        // Apps configuration
        if let Ok(apps_dir) = env::var("SPACERINI_APPS_DIR") {
            self.apps.apps_dir = PathBuf::from(apps_dir);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        ByteSize::parse(&self.sharding.shard_size)?;

        if self.indexing.threads == Threads::Fixed(0) {
            return Err(SpaceriniError::ConfigError(
                "Thread count must be non-zero".to_string(),
            ));
        }

        if self
            .indexing
            .memory_buffer
            .parse::<u64>()
            .map_or(true, |mb| mb == 0)
        {
            return Err(SpaceriniError::ConfigError(format!(
                "Memory buffer must be a positive number of MB, got '{}'",
                self.indexing.memory_buffer
            )));
        }

        // Validate search config
        if self.search.default_k == 0 {
            return Err(SpaceriniError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(SpaceriniError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.page_size == 0 {
            return Err(SpaceriniError::ConfigError(
                "Page size must be non-zero".to_string(),
            ));
        }

        if !self.search.hybrid_alpha.is_finite() || self.search.hybrid_alpha < 0.0 {
            return Err(SpaceriniError::ConfigError(
                "Hybrid alpha must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::debug!("Configuration loaded:");
        tracing::debug!("  Shard size: {}", self.sharding.shard_size);
        tracing::debug!("  Keep shards: {}", self.sharding.keep_shards);
        tracing::debug!("  Threads: {}", self.indexing.threads);
        tracing::debug!("  Memory buffer: {} MB", self.indexing.memory_buffer);
        tracing::debug!("  Language: {:?}", self.indexing.language);
        tracing::debug!("  Default k: {}", self.search.default_k);
        tracing::debug!("  Max k: {}", self.search.max_k);
        tracing::debug!("  Page size: {}", self.search.page_size);
        tracing::debug!("  Hub endpoint: {}", self.hub.endpoint);
        tracing::debug!(
            "  Hub token: {}",
            if self.hub.token.is_some() { "set" } else { "not set" }
        );
        tracing::debug!("  Apps dir: {:?}", self.apps.apps_dir);
    }
}
