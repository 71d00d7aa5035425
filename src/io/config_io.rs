use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::config::AppConfig;

/// Error type for reading the user config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the user's home directory
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Directory holding the registry and config, respecting SCRIPTWRITER_HOME
pub fn scriptwriter_dir() -> PathBuf {
    std::env::var("SCRIPTWRITER_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".scriptwriter"))
}

pub fn config_path() -> PathBuf {
    scriptwriter_dir().join("config.toml")
}

/// Read the config from a specific path. A missing file gives the defaults.
pub fn read_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the config from the default location.
pub fn read_config() -> Result<AppConfig, ConfigError> {
    read_config_from(&config_path())
}
