mod execute;
mod output;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Write the database image to a file
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad export backup.duckdb             # Snapshot the default database
  duckpad --name sales export sales.duckdb
  duckpad load backup.duckdb               # Restore it later")]
pub struct ExportCmd {
    /// File to write; overwritten if it exists
    pub output: PathBuf,
}

impl CommandRunner for ExportCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
