//! Result projection: engine result sets to a row/column view for rendering.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::db::{CellValue, QueryResult};
use crate::output::{render_grid, Outputable};

/// One row, keyed by column name in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    cells: Vec<(String, CellValue)>,
}

impl ProjectedRow {
    /// Value of `column`, or None if the result has no such column.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Cells in column order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// Serialized as a map so JSON keys follow column order.
impl Serialize for ProjectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ProjectedTable {
    pub columns: Vec<String>,
    pub rows: Vec<ProjectedRow>,
}

impl ProjectedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Convert a result set into ordered columns plus rows keyed by column.
///
/// Column order is exactly the engine's. Rows with fewer cells than columns
/// are completed with nulls.
pub fn project(result: &QueryResult) -> ProjectedTable {
    let rows = result
        .rows
        .iter()
        .map(|row| ProjectedRow {
            cells: result
                .headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or(CellValue::Null)))
                .collect(),
        })
        .collect();

    ProjectedTable {
        columns: result.headers.clone(),
        rows,
    }
}

impl Outputable for ProjectedTable {
    fn to_table(&self) -> String {
        if self.columns.is_empty() {
            return "(no columns)".to_string();
        }

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.values().map(CellValue::render).collect())
            .collect();

        let footer = match self.rows.len() {
            1 => "(1 row)".to_string(),
            n => format!("({} rows)", n),
        };
        format!("{}\n{}", render_grid(&self.columns, &rendered), footer)
    }
}
