//! XDG Base Directory Support
//!
//! Resolves where spacerini reads its configuration file and where
//! indexes pulled from the hub are cached.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directories used by spacerini
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit SPACERINI_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.cache)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("SPACERINI_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            cache_dir: resolve("SPACERINI_CACHE_DIR", "XDG_CACHE_HOME", &[".cache"]),
        }
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("SPACERINI_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Directory holding indexes downloaded from the hub
    pub fn hub_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("hub")
    }

    /// Create all XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.hub_cache_dir())?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Cache: {:?}", self.cache_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(explicit_var: &str, xdg_var: &str, default_parts: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(explicit_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join("spacerini");
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in default_parts {
        path.push(part);
    }
    path.join("spacerini")
}
