//! User configuration.
//!
//! Loaded from `~/.config/devstrap/config.yaml`. A missing file is not an
//! error: every setting has a default, and the config mostly exists so the
//! backup script knows what to copy where.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Result;

pub const DEFAULT_CONFIG_FILE_PATH: &str = ".config/devstrap/config.yaml";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct DevstrapConfig {
    pub backup: BackupConfig,
    pub cleanup: CleanupConfig,
    pub history: HistoryConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct BackupConfig {
    /// Directories to back up.
    pub sources: Vec<PathBuf>,
    /// Where timestamped backup directories are created.
    pub destination: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CleanupConfig {
    /// Directory name the cleanup script hunts for.
    pub name: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        CleanupConfig {
            name: "node_modules".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Override the detected shell history file.
    pub file: Option<PathBuf>,
}

impl DevstrapConfig {
    pub fn load_from_str(yaml_str: &str) -> Result<Self> {
        let config =
            serde_yaml::from_str(yaml_str).context("Failed to parse configuration file")?;
        Ok(config)
    }

    /// Load from `file`, falling back to defaults when it doesn't exist.
    pub fn load_from(file: &Path) -> Result<Self> {
        debug!("Loading config from: {}", file.display());
        if file.exists() {
            let yaml_str = fs::read_to_string(file)?;
            Self::load_from_str(&yaml_str)
        } else {
            warn!("Can't find config file: {}", file.display());
            warn!("Using default config");
            Ok(Self::default())
        }
    }

    /// Load from the default location under the user's home directory.
    pub fn load_default() -> Result<Self> {
        let home = crate::os::home_dir()?;
        Self::load_from(&home.join(DEFAULT_CONFIG_FILE_PATH))
    }

    pub fn export(&self) -> Result<String> {
        let serialized =
            serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        Ok(serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DevstrapConfig::default();
        assert_eq!(config.cleanup.name, "node_modules");
        assert!(config.backup.sources.is_empty());
        assert!(config.history.file.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = DevstrapConfig::load_from(&tmp.path().join("nope.yaml")).unwrap();
        assert_eq!(config, DevstrapConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let yaml = "backup:\n  sources:\n    - /home/me/projects\n  destination: /mnt/backup\n";
        let config = DevstrapConfig::load_from_str(yaml).unwrap();
        assert_eq!(config.backup.sources, vec![PathBuf::from("/home/me/projects")]);
        assert_eq!(config.backup.destination, Some(PathBuf::from("/mnt/backup")));
        assert_eq!(config.cleanup.name, "node_modules");
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = DevstrapConfig::load_from_str(": not yaml :").unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_export_round_trip() {
        let mut config = DevstrapConfig::default();
        config.cleanup.name = "target".to_string();
        let yaml = config.export().unwrap();
        let reloaded = DevstrapConfig::load_from_str(&yaml).unwrap();
        assert_eq!(config, reloaded);
    }
}
