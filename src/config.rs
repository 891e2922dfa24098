//! Configuration file handling for engine storage.
//!
//! This module provides loading and parsing of `.duckpad.json` configuration files.
//! Storage is selected with a `mode`-tagged JSON object.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::{EngineConfig, DEFAULT_DATABASE_NAME};

/// Config file looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".duckpad.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Storage configuration
    pub storage: StorageConfigFile,

    /// Engine worker threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
}

/// Storage variants.
///
/// JSON format uses a "mode" field with lowercase variant names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StorageConfigFile {
    /// Nothing survives the process
    Memory,
    /// Named database file under a storage root
    Persistent {
        #[serde(default = "default_database_name")]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        root: Option<PathBuf>,
    },
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            return Err(format!(
                "Configuration file not found: {}\n\n\
                 Examples:\n\
                 \n\
                 Persistent:\n\
                 {{\n  \
                   \"storage\": {{\n    \
                     \"mode\": \"persistent\",\n    \
                     \"name\": \"analytics\",\n    \
                     \"root\": \".duckpad\"\n  \
                   }}\n\
                 }}\n\
                 \n\
                 In-memory:\n\
                 {{\n  \
                   \"storage\": {{\n    \
                     \"mode\": \"memory\"\n  \
                   }}\n\
                 }}\n",
                path.display()
            )
            .into());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Load `.duckpad.json` from the current directory if it exists.
    pub fn load_default() -> Result<Option<Self>, Box<dyn Error>> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Convert to an engine config. `default_root` is used when the file
    /// names no storage root.
    pub fn to_engine_config(&self, default_root: &Path) -> Result<EngineConfig, Box<dyn Error>> {
        let mut config = match &self.storage {
            StorageConfigFile::Memory => EngineConfig::memory().with_root(default_root),
            StorageConfigFile::Persistent { name, root } => EngineConfig::persistent(name.as_str())
                .with_root(root.clone().unwrap_or_else(|| default_root.to_path_buf())),
        };
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config.validate()?;
        Ok(config)
    }
}
