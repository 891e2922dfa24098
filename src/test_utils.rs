//! Shared test utilities for facade and command tests.
//!
//! Provides in-memory DuckDB handles preloaded with data, plus fake engine
//! factories that record every call the facade makes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::db::{Connection, DbError, Engine, EngineConfig, EngineFactory, EngineHandle, QueryResult};
use crate::ingest::ingest;

/// Create a Ready in-memory DuckDB handle.
pub fn memory_handle() -> Arc<EngineHandle> {
    let handle = Arc::new(EngineHandle::new());
    handle
        .initialize(EngineConfig::memory())
        .expect("In-memory engine should initialize");
    handle
}

/// Create an in-memory handle with one table loaded from CSV text.
pub fn csv_handle(table: &str, csv: &str) -> Arc<EngineHandle> {
    let handle = memory_handle();
    ingest(&handle, csv.as_bytes(), "fixture.csv", table).expect("CSV ingest should succeed");
    handle
}

/// Create a handle with the standard two-row `people` table.
pub fn people_handle() -> Arc<EngineHandle> {
    csv_handle("people", PEOPLE_CSV)
}

pub const PEOPLE_CSV: &str = "id,name\n1,Alice\n2,Bob\n";

/// Write `content` to `name` inside a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn create_temp_file(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Count rows in `table` through a fresh session.
pub fn count_rows(handle: &Arc<EngineHandle>, table: &str) -> i64 {
    crate::catalog::row_count(handle, table).expect("count should succeed")
}

// =============================================================================
// Fake engines
// =============================================================================

type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, call: impl Into<String>) {
    log.lock().expect("call log poisoned").push(call.into());
}

/// Engine factory whose engines do nothing but record calls.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    log: CallLog,
}

impl RecordingFactory {
    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().expect("call log poisoned").clone()
    }
}

impl EngineFactory for RecordingFactory {
    fn open(&self, _config: &EngineConfig) -> Result<Box<dyn Engine>, DbError> {
        record(&self.log, "open");
        Ok(Box::new(RecordingEngine {
            log: Arc::clone(&self.log),
        }))
    }

    fn delete_persistent(&self, _root: &Path, name: &str) -> Result<bool, DbError> {
        record(&self.log, format!("delete {}", name));
        Ok(true)
    }
}

struct RecordingEngine {
    log: CallLog,
}

impl Engine for RecordingEngine {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    fn connect(&self) -> Result<Box<dyn Connection>, DbError> {
        record(&self.log, "connect");
        Ok(Box::new(RecordingConnection {
            log: Arc::clone(&self.log),
        }))
    }

    fn export_image(&self) -> Result<Vec<u8>, DbError> {
        record(&self.log, "export");
        Ok(b"image".to_vec())
    }

    fn import_image(&self, image: &[u8]) -> Result<(), DbError> {
        record(&self.log, format!("import {}", image.len()));
        Ok(())
    }

    fn close(&self) -> Result<(), DbError> {
        record(&self.log, "close");
        Ok(())
    }
}

struct RecordingConnection {
    log: CallLog,
}

impl Connection for RecordingConnection {
    fn register_buffer(&mut self, virtual_path: &str, _bytes: &[u8]) -> Result<String, DbError> {
        record(&self.log, format!("register {}", virtual_path));
        Ok(virtual_path.to_string())
    }

    fn drop_buffer(&mut self, virtual_path: &str) -> Result<(), DbError> {
        record(&self.log, format!("drop {}", virtual_path));
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult, DbError> {
        record(&self.log, format!("query {}", sql));
        Ok(QueryResult::default())
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), DbError> {
        record(&self.log, format!("batch {}", sql));
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DbError> {
        record(&self.log, "close connection");
        Ok(())
    }
}

/// Factory whose first `failures` opens fail the way a missing engine module
/// would; later opens succeed with a recording engine.
pub struct FailingFactory {
    remaining: Mutex<usize>,
    inner: RecordingFactory,
}

impl FailingFactory {
    pub fn new(failures: usize) -> Self {
        Self {
            remaining: Mutex::new(failures),
            inner: RecordingFactory::default(),
        }
    }
}

impl EngineFactory for FailingFactory {
    fn open(&self, config: &EngineConfig) -> Result<Box<dyn Engine>, DbError> {
        let mut remaining = self.remaining.lock().expect("counter poisoned");
        if *remaining > 0 {
            *remaining -= 1;
            return Err(DbError::InitFailed {
                cause: "engine module could not be loaded".to_string(),
            });
        }
        self.inner.open(config)
    }

    fn delete_persistent(&self, root: &Path, name: &str) -> Result<bool, DbError> {
        self.inner.delete_persistent(root, name)
    }
}
