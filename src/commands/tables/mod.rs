mod execute;
mod output;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// List tables in the database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad tables                    # Tables in the default database
  duckpad --name sales tables       # Tables in the 'sales' database
  duckpad tables -o json")]
pub struct TablesCmd {}

impl CommandRunner for TablesCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
