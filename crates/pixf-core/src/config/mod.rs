//! Configuration management for pixf.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for pixf.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Encode pool settings
    pub pool: PoolConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.pixf.pixf/config.toml
    /// - Linux: ~/.config/pixf/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\pixf\config\config.toml
    ///
    /// Falls back to ~/.pixf/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "pixf", "pixf")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".pixf").join("config.toml")
            })
    }

    /// Derive the output directory for a document: `<dir_prefix><stem>`,
    /// placed in the current working directory.
    pub fn output_dir_for(&self, document: &Path) -> PathBuf {
        let stem = document
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        PathBuf::from(format!("{}{}", self.output.dir_prefix, stem))
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir_prefix, "images_");
        assert_eq!(config.output.default_format, "native");
        assert_eq!(config.pool.workers, 0);
        assert_eq!(config.limits.max_image_dimension, 20000);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[output]"));
        assert!(toml.contains("[pool]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pool]\nworkers = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pool.workers, 3);
        assert_eq!(config.pool.max_idle_buffers, 32);
        assert_eq!(config.output.default_format, "native");
    }

    #[test]
    fn test_effective_workers_auto() {
        let pool = PoolConfig::default();
        assert!(pool.effective_workers() >= 1);

        let pinned = PoolConfig {
            workers: 2,
            ..PoolConfig::default()
        };
        assert_eq!(pinned.effective_workers(), 2);
    }

    #[test]
    fn test_output_dir_for_document() {
        let config = Config::default();
        let dir = config.output_dir_for(Path::new("/tmp/reports/q3.pdf"));
        assert_eq!(dir, PathBuf::from("images_q3"));
    }

    #[test]
    fn test_expand_path_without_tilde_is_unchanged() {
        let path = Path::new("/var/data/out");
        assert_eq!(expand_path(path), PathBuf::from("/var/data/out"));
    }
}
