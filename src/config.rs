//! Engine configuration
//!
//! Read from a TOML file. Every field has a default, so an empty or missing
//! file yields a working setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::inventory::DEFAULT_INVENTORY_SLOTS;
use crate::quest::log::DEFAULT_LOG_RETENTION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Root of the content tree; quests live under `<data_dir>/quests`
    pub data_dir: PathBuf,
    /// Preferred language for titles and descriptions
    pub language: String,
    /// Quests started on a new game
    pub starting_quests: Vec<String>,
    /// Log entries kept when saving
    pub log_retention: usize,
    /// Default tracing directive, overridden by RUST_LOG
    pub log_filter: String,
    pub inventory_slots: usize,
    /// Completing a quest advances `quest` objectives that wait on it.
    /// Leave off when the host submits `quest` events itself.
    pub completion_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            language: "en".to_string(),
            starting_quests: Vec::new(),
            log_retention: DEFAULT_LOG_RETENTION,
            log_filter: "village_quests=info".to_string(),
            inventory_slots: DEFAULT_INVENTORY_SLOTS,
            completion_events: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
