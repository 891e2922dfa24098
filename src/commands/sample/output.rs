//! Output formatting for sample command results.

use super::execute::SampleResult;
use crate::output::Outputable;

impl Outputable for SampleResult {
    fn to_table(&self) -> String {
        let columns: Vec<String> = self
            .table
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.data_type))
            .collect();
        format!(
            "Created sample table '{}' ({} rows)\nColumns: {}",
            self.table.name,
            self.rows,
            columns.join(", ")
        )
    }
}
