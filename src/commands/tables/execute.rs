use std::error::Error;
use std::sync::Arc;

use serde::Serialize;

use super::TablesCmd;
use crate::catalog::{list_tables, row_count};
use crate::commands::Execute;
use crate::db::EngineHandle;

#[derive(Debug, Clone, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub rows: i64,
}

/// Result of the tables command execution
#[derive(Debug, Default, Serialize)]
pub struct TablesResult {
    pub tables: Vec<TableEntry>,
}

impl Execute for TablesCmd {
    type Output = TablesResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let tables = list_tables(handle)?
            .into_iter()
            .map(|name| {
                let rows = row_count(handle, &name)?;
                Ok(TableEntry { name, rows })
            })
            .collect::<Result<Vec<_>, crate::db::DbError>>()?;
        Ok(TablesResult { tables })
    }
}
