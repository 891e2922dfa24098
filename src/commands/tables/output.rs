//! Output formatting for tables command results.

use super::execute::TablesResult;
use crate::output::{render_grid, Outputable};

impl Outputable for TablesResult {
    fn to_table(&self) -> String {
        if self.tables.is_empty() {
            return "No tables found.".to_string();
        }

        let headers = vec!["TABLE".to_string(), "ROWS".to_string()];
        let rows: Vec<Vec<String>> = self
            .tables
            .iter()
            .map(|t| vec![t.name.clone(), t.rows.to_string()])
            .collect();
        render_grid(&headers, &rows)
    }
}
