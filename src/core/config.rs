//! Runtime configuration for a viewer workspace.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Workspace-level settings: where plugins are discovered and how the tile
/// subsystem behaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories scanned for dynamic plugin modules, in order.
    pub plugin_dirs: Vec<PathBuf>,
    /// Maximum number of tiles held in the in-memory cache.
    pub tile_cache_capacity: usize,
    /// User-Agent header sent to tile servers.
    pub user_agent: String,
}

impl Config {
    /// Adds a plugin search directory, keeping the existing ones.
    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dirs.push(dir.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_dirs: vec![
                PathBuf::from("./plugins"),
                PathBuf::from("../plugins"),
                PathBuf::from("./build/plugins"),
                PathBuf::from("/usr/local/lib/geoscope/plugins"),
            ],
            tile_cache_capacity: 1024,
            user_agent: concat!("geoscope/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.plugin_dirs.is_empty());
        assert!(config.tile_cache_capacity > 0);
        assert!(config.user_agent.starts_with("geoscope/"));
    }

    #[test]
    fn test_with_plugin_dir() {
        let config = Config::default().with_plugin_dir("/opt/geoscope/plugins");
        assert!(config
            .plugin_dirs
            .contains(&PathBuf::from("/opt/geoscope/plugins")));
    }
}
