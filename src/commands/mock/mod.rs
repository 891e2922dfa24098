mod execute;
mod output;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Largest row count accepted; ids are 32-bit integers.
const MAX_ROWS: u64 = i32::MAX as u64;

/// Create a table of generated users, inserted in timed batches
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad mock -t users                    # 10000 rows in batches of 500
  duckpad mock -t users -r 250000          # Larger load to compare batch timings
  duckpad --memory mock -t users -o json   # Timings as JSON, nothing persisted")]
pub struct MockCmd {
    /// Table to create
    #[arg(short, long)]
    pub table: String,

    /// Number of rows to generate
    #[arg(short, long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..=MAX_ROWS))]
    pub rows: u64,
}

impl CommandRunner for MockCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
