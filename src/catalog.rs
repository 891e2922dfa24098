//! Table metadata: listing, describing and counting tables in `main`.

use std::sync::Arc;

use serde::Serialize;

use crate::db::{quote_identifier, quote_literal, with_session, DbError, EngineHandle, Session};

/// One column of a table, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
}

/// A table and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

/// Names of all tables and views in the `main` schema, sorted.
pub fn list_tables(handle: &Arc<EngineHandle>) -> Result<Vec<String>, DbError> {
    with_session(handle, |session| {
        let result = session.execute(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_catalog = current_database() AND table_schema = 'main' \
             ORDER BY table_name",
        )?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.first().and_then(|v| v.as_string()))
            .collect())
    })
}

/// Columns of an existing table.
pub fn describe_table(handle: &Arc<EngineHandle>, name: &str) -> Result<TableSpec, DbError> {
    with_session(handle, |session| describe_in(session, name))
}

/// Describe `name` using an already open session.
pub(crate) fn describe_in(session: &mut Session, name: &str) -> Result<TableSpec, DbError> {
    let result = session.execute(&format!(
        "SELECT column_name, data_type FROM information_schema.columns \
         WHERE table_catalog = current_database() AND table_schema = 'main' \
         AND table_name = {} ORDER BY ordinal_position",
        quote_literal(name)
    ))?;

    if result.rows.is_empty() {
        return Err(DbError::TableNotFound {
            name: name.to_string(),
        });
    }

    let columns = result
        .rows
        .iter()
        .map(|row| ColumnSpec {
            name: row.first().and_then(|v| v.as_string()).unwrap_or_default(),
            data_type: row.get(1).and_then(|v| v.as_string()).unwrap_or_default(),
        })
        .collect();

    Ok(TableSpec {
        name: name.to_string(),
        columns,
    })
}

/// Number of rows in `table`.
pub fn row_count(handle: &Arc<EngineHandle>, table: &str) -> Result<i64, DbError> {
    let quoted = quote_identifier(table)?;
    with_session(handle, |session| {
        let result = session.execute(&format!("SELECT count(*) FROM {}", quoted))?;
        Ok(result.scalar_i64().unwrap_or(0))
    })
}
