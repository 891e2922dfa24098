//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl producing a serializable result
//! - An `Outputable` impl rendering that result as a table

mod clear;
mod export;
mod load;
mod mock;
mod query;
mod sample;
mod size;
mod tables;

pub use clear::ClearCmd;
pub use export::ExportCmd;
pub use load::LoadCmd;
pub use mock::MockCmd;
pub use query::QueryCmd;
pub use sample::SampleCmd;
pub use size::SizeCmd;
pub use tables::TablesCmd;

use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use std::error::Error;
use std::sync::Arc;

use crate::db::{EngineConfig, EngineHandle};
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>>;
}

/// Trait for running commands and formatting their output.
#[enum_dispatch]
pub trait CommandRunner {
    /// Execute the command against a Ready handle and return formatted output
    fn run(self, handle: &Arc<EngineHandle>, format: OutputFormat) -> Result<String, Box<dyn Error>>;

    /// Engine config this command needs, given the one resolved from flags and files.
    fn engine_config(&self, resolved: EngineConfig) -> EngineConfig {
        resolved
    }
}

#[derive(Subcommand, Debug)]
#[enum_dispatch(CommandRunner)]
pub enum Command {
    /// Load a CSV, Parquet or JSON file as a table, or a .duckdb image
    Load(LoadCmd),

    /// Create a table of generated users, inserted in timed batches
    Mock(MockCmd),

    /// Create the 100-row sample people table
    Sample(SampleCmd),

    /// Run SQL and print the result
    Query(QueryCmd),

    /// List tables in the database
    Tables(TablesCmd),

    /// Write the database image to a file
    Export(ExportCmd),

    /// Show the size of the database image
    Size(SizeCmd),

    /// Delete a named persistent database
    Clear(ClearCmd),
}
