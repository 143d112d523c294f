//! Configuration handling for the catalog CLI
//!
//! User configuration is stored in `~/.config/nizami-cli/config.toml` (or
//! the platform equivalent). Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog file used when nothing else is configured
pub const DEFAULT_CATALOG_FILE: &str = "books.json";

/// Prompt shown by the interactive shell
pub const DEFAULT_PROMPT: &str = "(Nizami) ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatSetting {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Catalog file, relative paths resolved against the working directory
    pub catalog_file: Option<PathBuf>,

    /// Default output format (text or json)
    pub default_format: FormatSetting,

    /// Interactive shell prompt
    pub prompt: Option<String>,
}

impl Config {
    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "nizami", "nizami-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from an explicit path or the default location
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Picks the catalog file: explicit override, then config, then default
    pub fn catalog_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.catalog_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
    }

    /// Returns the shell prompt
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }
}
