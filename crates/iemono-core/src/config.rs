use crate::dashboard::DEFAULT_TIMELINE_LIMIT;
use crate::expiry::ClassifyOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// This is about the app itself (where the data lives, which status model to
/// use), not the user's in-app settings, which live in the store.
/// Priority: CLI > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub expiry: ExpiryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load config from default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("iemono");

        Ok(config_dir.join("config.toml"))
    }

    /// Database file, either configured or under the platform data dir
    pub fn database_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("iemono");

        Ok(data_dir.join("iemono.db"))
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            separate_today_status: self.expiry.separate_today_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Override for the database file location
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryConfig {
    /// Keep "expires today" as its own status instead of folding it into warning
    #[serde(default = "default_separate_today")]
    pub separate_today_status: bool,
}

fn default_separate_today() -> bool {
    true
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            separate_today_status: default_separate_today(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// How many rows the expiry timeline shows
    #[serde(default = "default_timeline_limit")]
    pub timeline_limit: usize,
}

fn default_timeline_limit() -> usize {
    DEFAULT_TIMELINE_LIMIT
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timeline_limit: default_timeline_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.expiry.separate_today_status);
        assert_eq!(config.dashboard.timeline_limit, 6);
        assert_eq!(config.storage.path, None);
        assert!(config.classify_options().separate_today_status);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("separate_today_status"));
        assert!(toml.contains("timeline_limit"));
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = toml::from_str("[expiry]\nseparate_today_status = false\n").unwrap();
        assert!(!config.expiry.separate_today_status);
        assert_eq!(config.dashboard.timeline_limit, 6);
    }

    #[test]
    fn test_configured_database_path_wins() {
        let config = Config {
            storage: StorageConfig {
                path: Some(PathBuf::from("/tmp/pantry.db")),
            },
            ..Config::default()
        };
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pantry.db"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            expiry: ExpiryConfig {
                separate_today_status: false,
            },
            dashboard: DashboardConfig { timeline_limit: 10 },
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
