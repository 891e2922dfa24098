//! DuckDB backend.
//!
//! One root `duckdb::Connection` per engine instance; sessions get clones of
//! it. Registered buffers are staged as files in a per-instance temporary
//! directory. Database images are DuckDB database files written with
//! `ATTACH` + `COPY FROM DATABASE`.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use duckdb::types::Value;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use super::backend::{Connection, Engine, EngineFactory, QueryResult};
use super::config::{persistent_path, validate_storage_name, EngineConfig};
use super::escape::{escape_string_for_quote, quote_literal};
use super::value::CellValue;
use super::DbError;

const EXPORT_ALIAS: &str = "duckpad_export";
const IMPORT_ALIAS: &str = "duckpad_import";

/// Opens DuckDB instances and deletes their database files.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDbFactory;

impl EngineFactory for DuckDbFactory {
    #[instrument(skip_all, fields(storage = ?config.storage))]
    fn open(&self, config: &EngineConfig) -> Result<Box<dyn Engine>, DbError> {
        Ok(Box::new(DuckDbEngine::open(config)?))
    }

    fn delete_persistent(&self, root: &Path, name: &str) -> Result<bool, DbError> {
        validate_storage_name(name)?;
        let db_path = persistent_path(root, name);
        let mut removed = false;
        for path in [wal_path(&db_path), db_path] {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed persistent storage file");
                    removed = true;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}

fn wal_path(db_path: &Path) -> PathBuf {
    let mut path = db_path.as_os_str().to_owned();
    path.push(".wal");
    PathBuf::from(path)
}

fn init_failed(e: impl Display) -> DbError {
    DbError::InitFailed {
        cause: e.to_string(),
    }
}

fn export_failed(e: impl Display) -> DbError {
    DbError::ExportFailed {
        message: e.to_string(),
    }
}

fn import_failed(e: impl Display) -> DbError {
    DbError::ImportFailed {
        message: e.to_string(),
    }
}

/// Quote a name read back from the catalog. Such names were accepted by the
/// engine already, so embedded quotes are escaped rather than rejected.
fn quote_catalog_name(name: &str) -> String {
    format!("\"{}\"", escape_string_for_quote(name, '"'))
}

fn current_database(conn: &duckdb::Connection) -> duckdb::Result<String> {
    conn.query_row("SELECT current_database()", [], |row| row.get(0))
}

fn remove_image_files(path: &Path) {
    for file in [wal_path(path), path.to_path_buf()] {
        if let Err(e) = fs::remove_file(&file) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %file.display(), error = %e, "failed to remove staged image");
            }
        }
    }
}

/// An opened DuckDB instance.
pub struct DuckDbEngine {
    root: Mutex<Option<duckdb::Connection>>,
    staging: TempDir,
    images: AtomicU64,
}

impl DuckDbEngine {
    fn open(config: &EngineConfig) -> Result<Self, DbError> {
        let mut settings = duckdb::Config::default();
        if let Some(threads) = config.threads {
            settings = settings.threads(i64::from(threads)).map_err(init_failed)?;
        }

        let conn = match config.database_path() {
            None => duckdb::Connection::open_in_memory_with_flags(settings),
            Some(path) => {
                fs::create_dir_all(&config.root).map_err(init_failed)?;
                duckdb::Connection::open_with_flags(&path, settings)
            }
        }
        .map_err(init_failed)?;

        let staging = tempfile::Builder::new()
            .prefix("duckpad-staging-")
            .tempdir()
            .map_err(init_failed)?;

        info!(
            database = ?config.database_path(),
            staging = %staging.path().display(),
            "DuckDB instance opened"
        );

        Ok(Self {
            root: Mutex::new(Some(conn)),
            staging,
            images: AtomicU64::new(0),
        })
    }

    fn lock_root(&self) -> MutexGuard<'_, Option<duckdb::Connection>> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_image_path(&self, kind: &str) -> PathBuf {
        let n = self.images.fetch_add(1, Ordering::Relaxed);
        self.staging.path().join(format!("{}_{}.duckdb", kind, n))
    }
}

impl Engine for DuckDbEngine {
    fn backend_name(&self) -> &'static str {
        "duckdb"
    }

    fn connect(&self) -> Result<Box<dyn Connection>, DbError> {
        let guard = self.lock_root();
        let root = guard.as_ref().ok_or(DbError::EngineClosed)?;
        let conn = root.try_clone().map_err(DbError::query_failed)?;
        Ok(Box::new(DuckDbConnection {
            conn,
            staging: self.staging.path().to_path_buf(),
            buffers: HashMap::new(),
        }))
    }

    #[instrument(skip_all)]
    fn export_image(&self) -> Result<Vec<u8>, DbError> {
        let guard = self.lock_root();
        let conn = guard.as_ref().ok_or(DbError::EngineClosed)?;
        let target = self.next_image_path("export");
        let current = current_database(conn).map_err(export_failed)?;

        conn.execute_batch(&format!(
            "ATTACH {} AS {}",
            quote_literal(&target.to_string_lossy()),
            EXPORT_ALIAS
        ))
        .map_err(export_failed)?;

        let copied = conn.execute_batch(&format!(
            "COPY FROM DATABASE {} TO {}; CHECKPOINT {}",
            quote_catalog_name(&current),
            EXPORT_ALIAS,
            EXPORT_ALIAS
        ));
        let detached = conn.execute_batch(&format!("DETACH {}", EXPORT_ALIAS));
        copied.map_err(export_failed)?;
        detached.map_err(export_failed)?;

        let image = fs::read(&target).map_err(export_failed);
        remove_image_files(&target);
        let image = image?;
        debug!(bytes = image.len(), database = %current, "exported image");
        Ok(image)
    }

    #[instrument(skip_all, fields(bytes = image.len()))]
    fn import_image(&self, image: &[u8]) -> Result<(), DbError> {
        let guard = self.lock_root();
        let conn = guard.as_ref().ok_or(DbError::EngineClosed)?;
        let source = self.next_image_path("import");
        fs::write(&source, image).map_err(import_failed)?;

        let attached = conn.execute_batch(&format!(
            "ATTACH {} AS {} (READ_ONLY)",
            quote_literal(&source.to_string_lossy()),
            IMPORT_ALIAS
        ));
        if let Err(e) = attached {
            remove_image_files(&source);
            return Err(DbError::InvalidImage {
                message: e.to_string(),
            });
        }

        let replaced = replace_contents(conn, IMPORT_ALIAS);
        let detached = conn.execute_batch(&format!("DETACH {}", IMPORT_ALIAS));
        remove_image_files(&source);
        replaced?;
        detached.map_err(import_failed)?;
        debug!("imported image");
        Ok(())
    }

    fn close(&self) -> Result<(), DbError> {
        let root = self.lock_root().take();
        if let Some(conn) = root {
            conn.close().map_err(|(_, e)| DbError::query_failed(e))?;
            info!("DuckDB instance closed");
        }
        Ok(())
    }
}

/// Replace the active database with the contents of the attached `source`
/// catalog. Runs as one transaction; on failure the prior contents stay.
fn replace_contents(conn: &duckdb::Connection, source: &str) -> Result<(), DbError> {
    let current = current_database(conn).map_err(import_failed)?;

    conn.execute_batch("BEGIN TRANSACTION").map_err(import_failed)?;
    let replaced = clear_catalog(conn).and_then(|dropped| {
        debug!(dropped, "cleared active database");
        conn.execute_batch(&format!(
            "COPY FROM DATABASE {} TO {}",
            quote_catalog_name(source),
            quote_catalog_name(&current)
        ))
        .map_err(import_failed)
    });

    match replaced {
        Ok(()) => conn.execute_batch("COMMIT").map_err(import_failed),
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                warn!(error = %rollback, "rollback after failed import");
            }
            Err(e)
        }
    }
}

/// Drop every user object of the active database: every schema but `main`,
/// then the views, tables, sequences and macros in `main`. Returns the drop
/// count.
fn clear_catalog(conn: &duckdb::Connection) -> Result<usize, DbError> {
    let statements = catalog_drop_statements(conn)?;
    for sql in &statements {
        conn.execute_batch(sql).map_err(import_failed)?;
    }
    Ok(statements.len())
}

/// Views depend on tables and tables on sequences, so the order is fixed.
const CATALOG_OBJECTS: [(&str, &str); 5] = [
    (
        "VIEW",
        "SELECT view_name FROM duckdb_views() \
         WHERE database_name = current_database() AND schema_name = 'main' \
         AND NOT internal AND NOT temporary",
    ),
    (
        "TABLE",
        "SELECT table_name FROM duckdb_tables() \
         WHERE database_name = current_database() AND schema_name = 'main' AND NOT temporary",
    ),
    (
        "SEQUENCE",
        "SELECT sequence_name FROM duckdb_sequences() \
         WHERE database_name = current_database() AND schema_name = 'main' AND NOT temporary",
    ),
    (
        "MACRO",
        "SELECT DISTINCT function_name FROM duckdb_functions() \
         WHERE database_name = current_database() AND schema_name = 'main' \
         AND function_type = 'macro' AND NOT internal",
    ),
    (
        "MACRO TABLE",
        "SELECT DISTINCT function_name FROM duckdb_functions() \
         WHERE database_name = current_database() AND schema_name = 'main' \
         AND function_type = 'table_macro' AND NOT internal",
    ),
];

const USER_SCHEMAS: &str = "SELECT schema_name FROM duckdb_schemas() \
     WHERE database_name = current_database() AND schema_name <> 'main' AND NOT internal";

fn catalog_drop_statements(conn: &duckdb::Connection) -> Result<Vec<String>, DbError> {
    let mut statements: Vec<String> = catalog_names(conn, USER_SCHEMAS)?
        .iter()
        .map(|schema| format!("DROP SCHEMA IF EXISTS {} CASCADE", quote_catalog_name(schema)))
        .collect();
    for (kind, sql) in CATALOG_OBJECTS {
        for name in catalog_names(conn, sql)? {
            statements.push(format!("DROP {} IF EXISTS {}", kind, quote_catalog_name(&name)));
        }
    }
    Ok(statements)
}

fn catalog_names(conn: &duckdb::Connection, sql: &str) -> Result<Vec<String>, DbError> {
    let mut stmt = conn.prepare(sql).map_err(import_failed)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(import_failed)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(import_failed)
}

/// Map a virtual path onto a file name inside the staging directory.
fn staging_file_name(virtual_path: &str) -> String {
    virtual_path
        .trim_start_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

struct DuckDbConnection {
    conn: duckdb::Connection,
    staging: PathBuf,
    buffers: HashMap<String, PathBuf>,
}

impl Connection for DuckDbConnection {
    fn register_buffer(&mut self, virtual_path: &str, bytes: &[u8]) -> Result<String, DbError> {
        let file = self.staging.join(staging_file_name(virtual_path));
        fs::write(&file, bytes)?;
        let resolved = file.to_string_lossy().into_owned();
        debug!(virtual_path, resolved = %resolved, bytes = bytes.len(), "registered buffer");
        self.buffers.insert(virtual_path.to_string(), file);
        Ok(resolved)
    }

    fn drop_buffer(&mut self, virtual_path: &str) -> Result<(), DbError> {
        if let Some(file) = self.buffers.remove(virtual_path) {
            match fs::remove_file(&file) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult, DbError> {
        let mut stmt = self.conn.prepare(sql).map_err(DbError::query_failed)?;
        let mut rows = stmt.query([]).map_err(DbError::query_failed)?;
        let headers = rows
            .as_ref()
            .map(|stmt| stmt.column_names())
            .unwrap_or_default();

        let mut result = QueryResult {
            headers,
            rows: Vec::new(),
        };
        let width = result.headers.len();
        while let Some(row) = rows.next().map_err(DbError::query_failed)? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let value: Value = row.get(i).map_err(DbError::query_failed)?;
                cells.push(CellValue::from(value));
            }
            result.rows.push(cells);
        }
        Ok(result)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), DbError> {
        self.conn.execute_batch(sql).map_err(DbError::query_failed)
    }

    fn close(self: Box<Self>) -> Result<(), DbError> {
        let DuckDbConnection { conn, buffers, .. } = *self;
        for file in buffers.into_values() {
            if let Err(e) = fs::remove_file(&file) {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %file.display(), error = %e, "failed to remove staged buffer");
                }
            }
        }
        conn.close().map_err(|(_, e)| DbError::query_failed(e))
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Boolean(b) => CellValue::Bool(b),
            Value::TinyInt(v) => CellValue::Int(v.into()),
            Value::SmallInt(v) => CellValue::Int(v.into()),
            Value::Int(v) => CellValue::Int(v.into()),
            Value::BigInt(v) => CellValue::Int(v),
            Value::UTinyInt(v) => CellValue::Int(v.into()),
            Value::USmallInt(v) => CellValue::Int(v.into()),
            Value::UInt(v) => CellValue::Int(v.into()),
            Value::UBigInt(v) => i64::try_from(v)
                .map(CellValue::Int)
                .unwrap_or_else(|_| CellValue::Text(v.to_string())),
            Value::HugeInt(v) => i64::try_from(v)
                .map(CellValue::Int)
                .unwrap_or_else(|_| CellValue::Text(v.to_string())),
            Value::Float(f) => CellValue::Float(f.into()),
            Value::Double(f) => CellValue::Float(f),
            Value::Decimal(d) => CellValue::Text(d.to_string()),
            Value::Text(s) | Value::Enum(s) => CellValue::Text(s),
            Value::Blob(b) => CellValue::Bytes(b),
            other => CellValue::Text(format!("{:?}", other)),
        }
    }
}
