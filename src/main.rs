//! snapsweep - snapshot backups with retention cleanup
//!
//! Main binary entry point for the command-line interface.

use clap::Parser;
use snapsweep::cli::{Cli, Commands};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Backup(args) => snapsweep::cli::backup::run(args).await,
        Commands::Prune(args) => snapsweep::cli::prune::run(args).await,
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
