use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use duckpad::cli::Args;
use duckpad::commands::CommandRunner;
use duckpad::db::EngineHandle;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Box<dyn Error>> {
    let config = args.command.engine_config(args.engine_config()?);

    let handle = Arc::new(EngineHandle::new());
    handle.initialize(config)?;

    let output = args.command.run(&handle, args.format);
    if let Err(e) = handle.shutdown() {
        warn!(error = %e, "engine did not shut down cleanly");
    }
    output
}

/// `RUST_LOG` wins when it holds valid directives; otherwise `-v` picks the level.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }

    if verbose {
        EnvFilter::new("duckpad=debug")
    } else {
        EnvFilter::new("duckpad=warn")
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, rust_log.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
