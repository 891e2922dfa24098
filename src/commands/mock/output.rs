//! Output formatting for mock command results.

use super::execute::MockResult;
use crate::output::Outputable;

impl Outputable for MockResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Inserted {} rows into '{}' in {} batch(es)",
            self.rows,
            self.table,
            self.batches.len()
        ));
        lines.push(String::new());

        for batch in &self.batches {
            lines.push(format!(
                "  rows {}-{}: {:.2} ms",
                batch.batch_start, batch.batch_end, batch.duration_ms
            ));
        }
        if !self.batches.is_empty() {
            lines.push(String::new());
        }

        lines.push(format!("Total: {:.2} ms", self.total_ms));
        lines.join("\n")
    }
}
