mod execute;
mod output;
mod output_tests;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::EngineHandle;
use crate::output::{OutputFormat, Outputable};

/// Load a CSV, Parquet or JSON file as a table, or a .duckdb image
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  duckpad load people.csv                  # Creates table 'people'
  duckpad load events.parquet -t events_2024
  duckpad load rows.json --memory          # Scratch session, nothing persisted
  duckpad load backup.duckdb               # Replace the database with an image")]
pub struct LoadCmd {
    /// File to load (.csv, .parquet, .json, or a .db/.duckdb image)
    pub file: PathBuf,

    /// Target table name (default: file name without extension)
    #[arg(short, long)]
    pub table: Option<String>,
}

impl CommandRunner for LoadCmd {
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(handle)?;
        Ok(result.format(format))
    }
}
