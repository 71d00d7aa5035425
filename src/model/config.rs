use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User configuration from `~/.scriptwriter/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base directory for new projects
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
    /// Lines of a card shown by `show` before it is cut off
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
    /// Display cells reserved for titles in the card listing
    #[serde(default = "default_title_width")]
    pub title_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scripts_dir: default_scripts_dir(),
            preview_lines: default_preview_lines(),
            title_width: default_title_width(),
        }
    }
}

fn default_scripts_dir() -> PathBuf {
    crate::io::config_io::home_dir()
        .join("Documents")
        .join("Scripts")
}

fn default_preview_lines() -> usize {
    10
}

fn default_title_width() -> usize {
    48
}
