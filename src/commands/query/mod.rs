mod execute;

use std::error::Error;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Run SQL and print the result
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad query 'SELECT * FROM people LIMIT 10'
  duckpad query 'SELECT age, count(*) FROM people GROUP BY age' -o json
  duckpad --memory query 'SELECT 42 AS answer'")]
pub struct QueryCmd {
    /// SQL statement to run
    pub sql: String,
}

impl CommandRunner for QueryCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
