mod execute;
mod output;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::{EngineConfig, EngineHandle};
use crate::output::{OutputFormat, Outputable};

/// Delete a named persistent database
///
/// Runs against a scratch in-memory engine so the target file is not open.
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad clear default                    # Delete .duckpad/default.duckdb
  duckpad --root /data/duckpad clear sales")]
pub struct ClearCmd {
    /// Name of the persistent database to delete
    #[arg(value_name = "NAME")]
    pub storage: String,
}

impl CommandRunner for ClearCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }

    fn engine_config(&self, resolved: EngineConfig) -> EngineConfig {
        resolved.into_memory()
    }
}
