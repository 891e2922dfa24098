//! Output formatting for size command results.

use super::execute::SizeResult;
use crate::output::Outputable;

impl Outputable for SizeResult {
    fn to_table(&self) -> String {
        format!("Database size: {} bytes ({:.2} KB)", self.bytes, self.kilobytes)
    }
}
