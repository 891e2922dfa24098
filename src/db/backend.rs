//! Backend seam between the facade and the embedded engine.
//!
//! The facade only ever talks to the engine through these three traits. The
//! DuckDB implementation lives in `connection.rs`; tests substitute a fake.

use std::path::Path;

use super::config::EngineConfig;
use super::value::CellValue;
use super::DbError;

/// Result of a query execution: column names in engine order plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First cell of the first row as an integer, for `count(*)`-style queries.
    pub fn scalar_i64(&self) -> Option<i64> {
        self.rows.first()?.first()?.as_i64()
    }
}

/// Loads engine instances and manages their persistent storage.
pub trait EngineFactory: Send + Sync {
    /// Instantiate the engine and open the configured storage.
    fn open(&self, config: &EngineConfig) -> Result<Box<dyn Engine>, DbError>;

    /// Delete the named persistent database under `root`.
    ///
    /// Returns true if anything was removed.
    fn delete_persistent(&self, root: &Path, name: &str) -> Result<bool, DbError>;
}

/// An opened engine instance.
pub trait Engine: Send + Sync {
    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Open a new connection to this instance.
    fn connect(&self) -> Result<Box<dyn Connection>, DbError>;

    /// Serialize the full database state into an opaque image.
    fn export_image(&self) -> Result<Vec<u8>, DbError>;

    /// Replace the database content with the supplied image.
    fn import_image(&self, image: &[u8]) -> Result<(), DbError>;

    /// Release the instance. Later calls fail with `EngineClosed`.
    fn close(&self) -> Result<(), DbError>;
}

/// A single engine connection, owned by one session.
pub trait Connection: Send {
    /// Make `bytes` readable by SQL under `virtual_path`.
    ///
    /// Returns the path string that SQL readers must reference.
    fn register_buffer(&mut self, virtual_path: &str, bytes: &[u8]) -> Result<String, DbError>;

    /// Forget a buffer registered with `register_buffer`.
    fn drop_buffer(&mut self, virtual_path: &str) -> Result<(), DbError>;

    /// Run one statement and collect its result.
    fn query(&mut self, sql: &str) -> Result<QueryResult, DbError>;

    /// Run a multi-statement script, discarding results.
    fn execute_batch(&mut self, sql: &str) -> Result<(), DbError>;

    fn close(self: Box<Self>) -> Result<(), DbError>;
}
