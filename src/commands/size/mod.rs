mod execute;
mod output;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Show the size of the database image
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad size
  duckpad --name sales size -o json")]
pub struct SizeCmd {}

impl CommandRunner for SizeCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
