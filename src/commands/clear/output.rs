//! Output formatting for clear command results.

use super::execute::ClearResult;
use crate::output::Outputable;

impl Outputable for ClearResult {
    fn to_table(&self) -> String {
        if self.removed {
            format!("Deleted persistent database '{}'", self.name)
        } else {
            format!("No persistent database named '{}'", self.name)
        }
    }
}
