//! Configuration loading and management
//!
//! Handles parsing of `taskdeck.toml` configuration files. The config
//! is optional; with no file present everything falls back to platform
//! defaults (data file under the user data directory, guest user).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "taskdeck.toml";
const DATA_FILE: &str = "tasks.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the board document. Overrides the platform default.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// User configuration
    #[serde(default)]
    pub user: UserConfig,
}

/// User-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Default user name when none is given on the command line
    #[serde(default)]
    pub default: Option<String>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. With no explicit path the
    /// platform config directory is consulted; a missing file there is
    /// fine and yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::InvalidConfig(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let Some(default_path) = default_config_path() else {
                    return Ok(Config::default());
                };
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the board document path: flag > config > platform data dir.
    pub fn resolve_data_file(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path);
        }
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        let dirs = project_dirs().ok_or_else(|| {
            Error::InvalidConfig(
                "could not determine a data directory; pass --data-file".to_string(),
            )
        })?;
        Ok(dirs.data_dir().join(DATA_FILE))
    }

    /// Resolve the acting user name: flag > config default.
    ///
    /// `None` means nobody is logged in; callers fall back to the guest
    /// placeholder or prompt interactively.
    pub fn resolve_user(&self, flag: Option<&str>) -> Option<String> {
        let from_flag = flag.map(str::trim).filter(|name| !name.is_empty());
        if let Some(name) = from_flag {
            return Some(name.to_string());
        }
        self.user
            .default
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "taskdeck")
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskdeck.toml");
        std::fs::write(
            &path,
            "data_file = \"/srv/board/tasks.json\"\n\n[user]\ndefault = \"mika\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(
            config.data_file.as_deref(),
            Some(Path::new("/srv/board/tasks.json"))
        );
        assert_eq!(config.user.default.as_deref(), Some("mika"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskdeck.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.data_file.is_none());
        assert!(config.user.default.is_none());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn data_file_flag_wins_over_config() {
        let config = Config {
            data_file: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        let resolved = config
            .resolve_data_file(Some(PathBuf::from("/from/flag.json")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag.json"));

        let resolved = config.resolve_data_file(None).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/config.json"));
    }

    #[test]
    fn user_flag_wins_and_blank_is_ignored() {
        let config = Config {
            user: UserConfig {
                default: Some("rui".to_string()),
            },
            ..Config::default()
        };
        assert_eq!(config.resolve_user(Some("mika")).as_deref(), Some("mika"));
        assert_eq!(config.resolve_user(Some("   ")).as_deref(), Some("rui"));
        assert_eq!(config.resolve_user(None).as_deref(), Some("rui"));
        assert!(Config::default().resolve_user(None).is_none());
    }
}
