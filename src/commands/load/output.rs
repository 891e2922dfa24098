//! Output formatting for load command results.

use super::execute::LoadResult;
use crate::output::Outputable;

impl Outputable for LoadResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        match self {
            LoadResult::Table {
                source,
                table,
                rows,
                ..
            } => {
                lines.push(format!("Loaded {} into table '{}' ({} rows)", source, table.name, rows));
                lines.push(String::new());
                lines.push(format!("Columns ({}):", table.columns.len()));
                for column in &table.columns {
                    lines.push(format!("  {} {}", column.name, column.data_type));
                }
            }
            LoadResult::Image {
                source,
                bytes,
                tables,
            } => {
                lines.push(format!("Imported {} ({} bytes)", source, bytes));
                lines.push(String::new());
                if tables.is_empty() {
                    lines.push("The image contains no tables.".to_string());
                } else {
                    lines.push(format!("Tables ({}):", tables.len()));
                    for name in tables {
                        lines.push(format!("  {}", name));
                    }
                }
            }
        }

        lines.join("\n")
    }
}
