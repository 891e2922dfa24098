//! End-to-end tests of the facade against a real DuckDB engine.
//!
//! Each test builds its own handle; persistent-mode tests keep their storage
//! root in a temporary directory.

use std::sync::Arc;

use duckpad::catalog::{describe_table, list_tables, row_count};
use duckpad::db::{
    persistent_path, quote_literal, with_session, DbError, EngineConfig, EngineHandle, EngineState,
    Session,
};
use duckpad::ingest::{ingest, ingest_sample, ingest_synthetic};
use duckpad::persistence::{clear_persistent, export_image, import_image, size_of};
use duckpad::projector::project;
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn memory_handle() -> Arc<EngineHandle> {
    let handle = Arc::new(EngineHandle::new());
    handle
        .initialize(EngineConfig::memory())
        .expect("in-memory engine should initialize");
    handle
}

#[fixture]
fn handle() -> Arc<EngineHandle> {
    memory_handle()
}

fn persistent_handle(root: &TempDir, name: &str) -> Arc<EngineHandle> {
    let handle = Arc::new(EngineHandle::new());
    handle
        .initialize(EngineConfig::persistent(name).with_root(root.path()))
        .expect("persistent engine should initialize");
    handle
}

/// Produce Parquet bytes by having a scratch engine write a file.
fn parquet_bytes(rows: u32) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.parquet");
    let scratch = memory_handle();
    with_session(&scratch, |session| {
        session.execute_batch(&format!(
            "COPY (SELECT range AS id, 'item_' || range::VARCHAR AS label FROM range({})) TO {} (FORMAT PARQUET)",
            rows,
            quote_literal(&path.to_string_lossy())
        ))
    })
    .unwrap();
    std::fs::read(&path).unwrap()
}

// =============================================================================
// Ingestion
// =============================================================================

#[rstest]
fn test_csv_row_count_matches_source(handle: Arc<EngineHandle>) {
    let csv = "id,city\n1,Oslo\n2,Lima\n3,Pune\n4,Kyiv\n";
    ingest(&handle, csv.as_bytes(), "cities.csv", "cities").unwrap();
    assert_eq!(row_count(&handle, "cities").unwrap(), 4);
}

#[rstest]
fn test_parquet_row_count_matches_source(handle: Arc<EngineHandle>) {
    let bytes = parquet_bytes(250);
    let spec = ingest(&handle, &bytes, "items.parquet", "items").unwrap();

    let columns: Vec<_> = spec.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "label"]);
    assert_eq!(row_count(&handle, "items").unwrap(), 250);
}

#[rstest]
fn test_json_row_count_matches_source(handle: Arc<EngineHandle>) {
    let json = r#"[{"sku": "a1", "qty": 3}, {"sku": "b2", "qty": 5}]"#;
    ingest(&handle, json.as_bytes(), "stock.json", "stock").unwrap();
    assert_eq!(row_count(&handle, "stock").unwrap(), 2);
}

#[rstest]
fn test_memory_csv_names_in_order(handle: Arc<EngineHandle>) {
    ingest(&handle, b"id,name\n1,Alice\n2,Bob", "people.csv", "t").unwrap();

    let result = with_session(&handle, |s| s.execute("SELECT name FROM t ORDER BY id")).unwrap();
    let table = project(&result);
    let names: Vec<_> = table
        .rows
        .iter()
        .map(|row| row.get("name").unwrap().render())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[rstest]
fn test_synthetic_ten_thousand_rows(handle: Arc<EngineHandle>) {
    let mut durations = Vec::new();
    let summary = ingest_synthetic(&handle, "t", 10_000, |p| durations.push(p.duration_ms)).unwrap();

    assert_eq!(summary.batches, 20);
    assert_eq!(durations.len(), 20);
    assert!(durations.iter().all(|d| *d >= 0.0));
    assert_eq!(row_count(&handle, "t").unwrap(), 10_000);
}

#[rstest]
fn test_empty_target_is_invalid_argument(handle: Arc<EngineHandle>) {
    let err = ingest(&handle, b"id\n1\n", "x.csv", "").unwrap_err();
    assert!(matches!(err, DbError::InvalidArgument { .. }));
    assert!(list_tables(&handle).unwrap().is_empty());
}

// =============================================================================
// Sessions
// =============================================================================

#[rstest]
fn test_execute_after_close(handle: Arc<EngineHandle>) {
    let mut session = Session::open(&handle).unwrap();
    session.close().unwrap();
    assert!(matches!(session.execute("SELECT 1"), Err(DbError::SessionClosed)));
}

#[rstest]
fn test_sessions_on_other_threads(handle: Arc<EngineHandle>) {
    ingest_sample(&handle, "people").unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || {
                with_session(&handle, |s| Ok(s.execute("SELECT count(*) FROM people")?.scalar_i64()))
            })
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap().unwrap(), Some(100));
    }
}

// =============================================================================
// Persistence
// =============================================================================

#[rstest]
fn test_export_import_round_trip(handle: Arc<EngineHandle>) {
    ingest_sample(&handle, "people").unwrap();
    ingest(&handle, b"k,v\na,1\nb,2\nc,3\n", "pairs.csv", "pairs").unwrap();
    let image = export_image(&handle).unwrap();

    let fresh = memory_handle();
    import_image(&fresh, &image).unwrap();

    assert_eq!(list_tables(&fresh).unwrap(), list_tables(&handle).unwrap());
    assert_eq!(row_count(&fresh, "people").unwrap(), 100);
    assert_eq!(row_count(&fresh, "pairs").unwrap(), 3);
    assert_eq!(
        describe_table(&fresh, "pairs").unwrap(),
        describe_table(&handle, "pairs").unwrap()
    );
}

#[rstest]
fn test_reimport_same_image_with_sequence_and_schema(handle: Arc<EngineHandle>) {
    with_session(&handle, |s| {
        s.execute_batch(
            "CREATE SEQUENCE seq1; \
             CREATE TABLE a (id INTEGER); INSERT INTO a VALUES (1), (2); \
             CREATE SCHEMA s; CREATE TABLE s.b (id INTEGER); INSERT INTO s.b VALUES (7);",
        )
    })
    .unwrap();
    let image = export_image(&handle).unwrap();

    import_image(&handle, &image).unwrap();
    import_image(&handle, &image).unwrap();

    assert_eq!(list_tables(&handle).unwrap(), vec!["a"]);
    assert_eq!(row_count(&handle, "a").unwrap(), 2);
    let b = with_session(&handle, |s| Ok(s.execute("SELECT count(*) FROM s.b")?.scalar_i64())).unwrap();
    assert_eq!(b, Some(1));
}

#[rstest]
fn test_size_of_reports_export_length(handle: Arc<EngineHandle>) {
    ingest_sample(&handle, "people").unwrap();
    let size = size_of(&handle).unwrap();
    assert_eq!(size, export_image(&handle).unwrap().len() as u64);
}

#[rstest]
fn test_persistent_storage_survives_restart() {
    let root = tempfile::tempdir().unwrap();

    let first = persistent_handle(&root, "tt");
    ingest_sample(&first, "people").unwrap();
    first.shutdown().unwrap();
    assert!(persistent_path(root.path(), "tt").exists());

    let second = persistent_handle(&root, "tt");
    assert_eq!(row_count(&second, "people").unwrap(), 100);
}

#[rstest]
fn test_reset_deletes_storage() {
    let root = tempfile::tempdir().unwrap();
    let handle = persistent_handle(&root, "tt");
    ingest_sample(&handle, "people").unwrap();

    handle.reset("tt").unwrap();
    assert_eq!(handle.state(), EngineState::Uninitialized);
    assert!(!persistent_path(root.path(), "tt").exists());

    handle
        .initialize(EngineConfig::persistent("tt").with_root(root.path()))
        .unwrap();
    assert!(list_tables(&handle).unwrap().is_empty());
}

#[rstest]
fn test_clear_other_persistent_storage() {
    let root = tempfile::tempdir().unwrap();
    let old = persistent_handle(&root, "old");
    ingest_sample(&old, "people").unwrap();
    old.shutdown().unwrap();

    let current = persistent_handle(&root, "current");
    assert!(matches!(
        clear_persistent(&current, "current"),
        Err(DbError::InvalidArgument { .. })
    ));
    assert!(clear_persistent(&current, "old").unwrap());
    assert!(!persistent_path(root.path(), "old").exists());
    assert!(!clear_persistent(&current, "old").unwrap());
}
