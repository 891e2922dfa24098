use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::LoadCmd;
use crate::catalog::{list_tables, row_count, TableSpec};
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::ingest::{ingest, IngestFormat};
use crate::persistence::import_image;

/// Result of the load command execution
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LoadResult {
    /// A data file became a new table
    Table {
        source: String,
        format: IngestFormat,
        table: TableSpec,
        rows: i64,
    },
    /// A database image replaced the database content
    Image {
        source: String,
        bytes: u64,
        tables: Vec<String>,
    },
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("db") || e.eq_ignore_ascii_case("duckdb"))
        .unwrap_or(false)
}

fn default_table_name(path: &Path) -> Result<String, Box<dyn Error>> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("Cannot derive a table name from {}; pass --table", path.display()).into())
}

impl Execute for LoadCmd {
    type Output = LoadResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let source = self.file.display().to_string();
        let bytes = fs::read(&self.file)
            .map_err(|e| format!("Failed to read {}: {}", source, e))?;

        if is_image(&self.file) {
            import_image(handle, &bytes)?;
            return Ok(LoadResult::Image {
                source,
                bytes: bytes.len() as u64,
                tables: list_tables(handle)?,
            });
        }

        let table_name = match self.table {
            Some(name) => name,
            None => default_table_name(&self.file)?,
        };
        let format = IngestFormat::from_source_name(&source)?;
        let table = ingest(handle, &bytes, &source, &table_name)?;
        let rows = row_count(handle, &table.name)?;

        Ok(LoadResult::Table {
            source,
            format,
            table,
            rows,
        })
    }
}
