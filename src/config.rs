//! Configuration management for ecalc.
//!
//! Loads configuration from ${ECALC_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_FILE;

pub mod paths {
    //! Path resolution for ecalc configuration.
    //!
    //! ECALC_HOME resolution order:
    //! 1. ECALC_HOME environment variable (if set)
    //! 2. ~/.config/ecalc (default)

    use std::path::PathBuf;

    /// Returns the ecalc home directory, if one can be determined.
    pub fn ecalc_home() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("ECALC_HOME") {
            return Some(PathBuf::from(home));
        }

        dirs::home_dir().map(|h| h.join(".config").join("ecalc"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> Option<PathBuf> {
        ecalc_home().map(|home| home.join("config.toml"))
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History file location (default: `.ecalc_history.json` in the working directory)
    pub history_file: Option<PathBuf>,

    /// Show the history list on startup
    pub show_history: bool,

    /// Copy every successful result to the clipboard
    pub copy_results: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_file: None,
            show_history: true,
            copy_results: false,
        }
    }
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        match paths::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// The history file to use.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE))
    }
}
