//! Ingestion adapter: turns file bytes or generated rows into engine tables.
//!
//! Every argument is checked before a session is opened, so a rejected
//! request leaves no trace in the engine.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::catalog::{describe_in, TableSpec};
use crate::db::{quote_identifier, quote_literal, with_session, DbError, EngineHandle};

/// Rows per INSERT statement for synthetic data.
pub const SYNTHETIC_BATCH_SIZE: u64 = 500;

/// Monotonic suffix for virtual paths, shared by all ingestions in the process.
static NEXT_BUFFER: AtomicU64 = AtomicU64::new(0);

/// Source formats the engine can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestFormat {
    Csv,
    Parquet,
    Json,
}

impl IngestFormat {
    /// Pick the format from the extension of `name`, ignoring case.
    pub fn from_source_name(name: &str) -> Result<Self, DbError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            "json" => Ok(Self::Json),
            _ => Err(DbError::UnsupportedFormat { extension }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
            Self::Json => "json",
        }
    }

    /// Table function reading `path` in this format.
    fn reader(self, path: &str) -> String {
        let path = quote_literal(path);
        match self {
            Self::Csv => format!("read_csv_auto({}, header = true)", path),
            Self::Parquet => format!("read_parquet({})", path),
            Self::Json => format!("read_json_auto({})", path),
        }
    }
}

fn virtual_path_for(target_table: &str, format: IngestFormat) -> String {
    let n = NEXT_BUFFER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}.{}", target_table, n, format.extension())
}

/// Load `buffer` as a new table called `target_table`.
///
/// The format comes from `declared_name`'s extension. The table is created by
/// a single `CREATE TABLE ... AS` statement; an existing table of the same
/// name makes the engine fail the statement.
#[instrument(skip(handle, buffer), fields(bytes = buffer.len()))]
pub fn ingest(
    handle: &Arc<EngineHandle>,
    buffer: &[u8],
    declared_name: &str,
    target_table: &str,
) -> Result<TableSpec, DbError> {
    if target_table.is_empty() {
        return Err(DbError::invalid_argument("target table name is empty"));
    }
    if buffer.is_empty() {
        return Err(DbError::invalid_argument(format!(
            "source '{}' is empty",
            declared_name
        )));
    }
    let table = quote_identifier(target_table)?;
    let format = IngestFormat::from_source_name(declared_name)?;
    let virtual_path = virtual_path_for(target_table, format);

    let spec = with_session(handle, |session| {
        let resolved = session.register_buffer(&virtual_path, buffer)?;
        let created = session.execute(&format!(
            "CREATE TABLE {} AS FROM {}",
            table,
            format.reader(&resolved)
        ));
        let dropped = session.drop_buffer(&virtual_path);
        created?;
        dropped?;
        describe_in(session, target_table)
    })?;

    info!(table = %spec.name, format = ?format, columns = spec.columns.len(), "table created");
    Ok(spec)
}

/// Timing for one synthetic insert batch. Bounds are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgress {
    pub batch_start: u64,
    pub batch_end: u64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntheticSummary {
    pub table: String,
    pub rows: u64,
    pub batches: u64,
}

fn synthetic_age(id: u64) -> u64 {
    20 + id % 40
}

/// Create `target_table` with `row_count` generated users, inserted
/// `SYNTHETIC_BATCH_SIZE` rows per statement. `on_batch` receives each
/// batch's timing as soon as it completes.
#[instrument(skip(handle, on_batch))]
pub fn ingest_synthetic(
    handle: &Arc<EngineHandle>,
    target_table: &str,
    row_count: u64,
    mut on_batch: impl FnMut(&BatchProgress),
) -> Result<SyntheticSummary, DbError> {
    if target_table.is_empty() {
        return Err(DbError::invalid_argument("target table name is empty"));
    }
    let table = quote_identifier(target_table)?;
    if row_count > i32::MAX as u64 {
        return Err(DbError::invalid_argument(format!(
            "row count {} exceeds the INTEGER id range",
            row_count
        )));
    }

    with_session(handle, |session| {
        session.execute(&format!(
            "CREATE TABLE {} (id INTEGER, name TEXT, age INTEGER)",
            table
        ))?;

        let mut batches = 0;
        let mut start = 1;
        while start <= row_count {
            let end = (start + SYNTHETIC_BATCH_SIZE - 1).min(row_count);
            let values = (start..=end)
                .map(|id| format!("({}, 'user_{}', {})", id, id, synthetic_age(id)))
                .collect::<Vec<_>>()
                .join(",\n");

            let began = Instant::now();
            session.execute(&format!("INSERT INTO {} VALUES\n{}", table, values))?;
            let progress = BatchProgress {
                batch_start: start,
                batch_end: end,
                duration_ms: began.elapsed().as_secs_f64() * 1000.0,
            };

            debug!(
                batch_start = progress.batch_start,
                batch_end = progress.batch_end,
                duration_ms = progress.duration_ms,
                "batch inserted"
            );
            on_batch(&progress);
            batches += 1;
            start = end + 1;
        }

        info!(table = target_table, rows = row_count, batches, "synthetic table created");
        Ok(SyntheticSummary {
            table: target_table.to_string(),
            rows: row_count,
            batches,
        })
    })
}

const SAMPLE_PEOPLE: [(i32, &str, i32); 10] = [
    (1, "Alice", 25),
    (2, "Bob", 32),
    (3, "Charlie", 40),
    (4, "Diana", 28),
    (5, "Ethan", 22),
    (6, "Fiona", 35),
    (7, "George", 30),
    (8, "Helen", 27),
    (9, "Ivan", 29),
    (10, "Jenny", 33),
];

/// Times the sample people are inserted.
const SAMPLE_REPEATS: usize = 10;

/// Create `target_table` holding the ten sample people ten times over
/// (100 rows), in one script.
#[instrument(skip(handle))]
pub fn ingest_sample(handle: &Arc<EngineHandle>, target_table: &str) -> Result<TableSpec, DbError> {
    let table = quote_identifier(target_table)?;

    let values = SAMPLE_PEOPLE
        .iter()
        .map(|(id, name, age)| format!("({}, {}, {})", id, quote_literal(name), age))
        .collect::<Vec<_>>()
        .join(", ");
    let mut script = format!("CREATE TABLE {} (id INTEGER, name TEXT, age INTEGER);\n", table);
    for _ in 0..SAMPLE_REPEATS {
        script.push_str(&format!("INSERT INTO {} VALUES {};\n", table, values));
    }

    with_session(handle, |session| {
        session.execute_batch(&script)?;
        describe_in(session, target_table)
    })
}
