mod execute;
mod output;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Create the 100-row sample people table
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad sample -t people
  duckpad sample -t people && duckpad query 'SELECT name, avg(age) FROM people GROUP BY name'")]
pub struct SampleCmd {
    /// Table to create
    #[arg(short, long)]
    pub table: String,
}

impl CommandRunner for SampleCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
