//! Output formatting for export command results.

use super::execute::ExportResult;
use crate::output::Outputable;

impl Outputable for ExportResult {
    fn to_table(&self) -> String {
        format!("Exported {} bytes to {}", self.bytes, self.path)
    }
}
