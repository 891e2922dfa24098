use std::error::Error;
use std::sync::Arc;

use serde::Serialize;

use super::SampleCmd;
use crate::catalog::{row_count, TableSpec};
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::ingest::ingest_sample;

/// Result of the sample command execution
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub table: TableSpec,
    pub rows: i64,
}

impl Execute for SampleCmd {
    type Output = SampleResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let table = ingest_sample(handle, &self.table)?;
        let rows = row_count(handle, &table.name)?;
        Ok(SampleResult { table, rows })
    }
}
