//! Prune command implementation for standalone retention sweeps.

use crate::config::DEFAULT_RETENTION_DAYS;
use crate::logging;
use crate::report::RunSummary;
use crate::retention;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

/// Arguments for the prune command
#[derive(Args)]
pub struct PruneArgs {
    /// Root directory holding the snapshot folders
    #[arg(short, long)]
    pub backup_dir: PathBuf,

    /// Retention window in days
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Report eligible folders without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the run log to this file
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the prune command
pub async fn run(args: PruneArgs) -> anyhow::Result<ExitCode> {
    logging::init(args.log_path.as_deref(), args.verbose)?;

    let decisions = retention::sweep(
        &args.backup_dir,
        args.retention_days,
        args.dry_run,
        Local::now(),
    )?;

    let mut summary = RunSummary::default();
    for decision in &decisions {
        summary.record_retention(decision);
    }

    if args.dry_run {
        println!(
            "Would delete {} snapshot folder(s), keeping {}",
            summary.would_delete, summary.kept
        );
    } else {
        println!(
            "Deleted {} snapshot folder(s), keeping {}",
            summary.deleted, summary.kept
        );
    }

    if summary.has_failures() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
