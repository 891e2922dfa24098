use std::error::Error;
use std::sync::Arc;

use serde::Serialize;

use super::MockCmd;
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::ingest::{ingest_synthetic, BatchProgress};

/// Result of the mock command execution
#[derive(Debug, Clone, Serialize)]
pub struct MockResult {
    pub table: String,
    pub rows: u64,
    pub batches: Vec<BatchProgress>,
    pub total_ms: f64,
}

impl Execute for MockCmd {
    type Output = MockResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let mut batches = Vec::new();
        let summary = ingest_synthetic(handle, &self.table, self.rows, |progress| {
            batches.push(progress.clone())
        })?;

        let total_ms = batches.iter().map(|b| b.duration_ms).sum();
        Ok(MockResult {
            table: summary.table,
            rows: summary.rows,
            batches,
            total_ms,
        })
    }
}
