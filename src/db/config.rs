//! Engine configuration.
//!
//! Storage is either in-memory or a named persistent database living under a
//! storage root directory (`<root>/<name>.duckdb`).

use std::path::{Path, PathBuf};

use super::DbError;

/// Default directory holding persistent databases.
pub const DEFAULT_STORAGE_ROOT: &str = ".duckpad";

/// Persistent database name used when none is given.
pub const DEFAULT_DATABASE_NAME: &str = "default";

/// Where the engine keeps its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// State lives only as long as the engine instance.
    Memory,
    /// State survives restarts in a named database file.
    Persistent { name: String },
}

/// Options recognized by `EngineHandle::initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub storage: StorageMode,
    /// Directory holding persistent databases. Also used when deleting named
    /// storage from a memory-mode engine.
    pub root: PathBuf,
    /// Worker threads for the engine; engine default when unset.
    pub threads: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::persistent(DEFAULT_DATABASE_NAME)
    }
}

impl EngineConfig {
    pub fn memory() -> Self {
        Self {
            storage: StorageMode::Memory,
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            threads: None,
        }
    }

    pub fn persistent(name: impl Into<String>) -> Self {
        Self {
            storage: StorageMode::Persistent { name: name.into() },
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            threads: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Same root and threads, memory storage.
    pub fn into_memory(self) -> Self {
        Self {
            storage: StorageMode::Memory,
            ..self
        }
    }

    /// Name of the persistent database, if any.
    pub fn persistent_name(&self) -> Option<&str> {
        match &self.storage {
            StorageMode::Memory => None,
            StorageMode::Persistent { name } => Some(name),
        }
    }

    /// File backing the persistent database, if any.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.persistent_name()
            .map(|name| persistent_path(&self.root, name))
    }

    /// Check the options before any engine is loaded.
    pub fn validate(&self) -> Result<(), DbError> {
        if let StorageMode::Persistent { name } = &self.storage {
            validate_storage_name(name)?;
        }
        if self.threads == Some(0) {
            return Err(DbError::invalid_argument("threads must be at least 1"));
        }
        Ok(())
    }

    /// Parse a storage URL.
    ///
    /// Supported formats:
    /// - `:memory:` → Memory
    /// - `persistent://<name>` or a bare `<name>` → Persistent
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if url == ":memory:" {
            return Ok(Self::memory());
        }

        let name = url.strip_prefix("persistent://").unwrap_or(url);
        validate_storage_name(name)?;
        Ok(Self::persistent(name))
    }

    /// Load from the `DUCKPAD_STORAGE` and `DUCKPAD_ROOT` environment variables.
    pub fn from_env() -> Result<Option<Self>, DbError> {
        let Ok(url) = std::env::var("DUCKPAD_STORAGE") else {
            return Ok(None);
        };
        let mut config = Self::from_url(&url)?;
        if let Ok(root) = std::env::var("DUCKPAD_ROOT") {
            config.root = PathBuf::from(root);
        }
        Ok(Some(config))
    }
}

/// Path of the database file for persistent storage `name` under `root`.
pub fn persistent_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{}.duckdb", name))
}

/// Persistent names become file names, so only a conservative character set
/// is accepted.
pub fn validate_storage_name(name: &str) -> Result<(), DbError> {
    if name.is_empty() {
        return Err(DbError::invalid_argument(
            "persistent storage requires a non-empty name",
        ));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if name.starts_with('.') || !name.chars().all(allowed) {
        return Err(DbError::invalid_argument(format!(
            "storage name '{}' may only contain letters, digits, '_', '-' and '.' and must not start with '.'",
            name.escape_default()
        )));
    }
    Ok(())
}
