//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and storage resolution.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use crate::commands::Command;
use crate::config::ConfigFile;
use crate::db::{EngineConfig, StorageMode, DEFAULT_STORAGE_ROOT};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Load files into an embedded DuckDB and query them", long_about = None)]
pub struct Args {
    /// Path to a JSON configuration file (default: .duckpad.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true, conflicts_with = "name")]
    pub memory: bool,

    /// Name of the persistent database to open
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Directory holding persistent databases
    ///
    /// If not specified, uses:
    ///   1. .duckpad/ (project-local) when it exists
    ///   2. ~/.duckpad/ (user-global) when it exists
    ///   3. .duckpad/ (created on first use)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Resolve the storage root by checking multiple locations in order of preference
pub fn resolve_storage_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(root) = explicit {
        return root;
    }

    let project_root = PathBuf::from(DEFAULT_STORAGE_ROOT);
    if project_root.exists() {
        return project_root;
    }

    if let Some(home_dir) = home::home_dir() {
        let global_root = home_dir.join(DEFAULT_STORAGE_ROOT);
        if global_root.exists() {
            return global_root;
        }
    }

    project_root
}

impl Args {
    /// Build the engine config for this invocation.
    ///
    /// Precedence: command-line flags, then the config file, then the
    /// `DUCKPAD_STORAGE`/`DUCKPAD_ROOT` environment, then the default
    /// persistent database.
    pub fn engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let default_root = resolve_storage_root(None);

        let file = match &self.config {
            Some(path) => Some(ConfigFile::load_from(path)?),
            None => ConfigFile::load_default()?,
        };

        let mut config = match file {
            Some(file) => file.to_engine_config(&default_root)?,
            None => match EngineConfig::from_env()? {
                Some(config) => config,
                None => EngineConfig::default().with_root(default_root),
            },
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(name) = &self.name {
            config.storage = StorageMode::Persistent { name: name.clone() };
        }
        if self.memory {
            config = config.into_memory();
        }

        config.validate()?;
        Ok(config)
    }
}
