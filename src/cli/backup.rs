//! Backup command implementation.

use crate::config::{RunConfig, DEFAULT_RETENTION_DAYS};
use crate::engine::BackupEngine;
use crate::logging;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

/// Arguments for the backup command
#[derive(Args)]
pub struct BackupArgs {
    /// Source directories to scan
    #[arg(short, long, required = true, num_args = 1..)]
    pub source_dirs: Vec<PathBuf>,

    /// Root directory snapshot folders are created under
    #[arg(short, long)]
    pub backup_dir: PathBuf,

    /// File extensions to include, e.g. .log .csv (case-insensitive)
    #[arg(short, long, required = true, num_args = 1..)]
    pub extensions: Vec<String>,

    /// Retention window in days, used with --delete-old
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Preview actions without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Delete snapshot folders older than the retention window
    #[arg(long)]
    pub delete_old: bool,

    /// Exclusion rules, substring-matched against path segments
    #[arg(long, num_args = 0..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Also write the run log to this file
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the backup command
pub async fn run(args: BackupArgs) -> anyhow::Result<ExitCode> {
    logging::init(args.log_path.as_deref(), args.verbose)?;

    let config = RunConfig::new(
        args.source_dirs,
        args.backup_dir,
        &args.extensions,
        &args.exclude,
    )?
    .with_retention_days(args.retention_days)
    .with_dry_run(args.dry_run)
    .with_delete_old(args.delete_old)
    .with_follow_symlinks(args.follow_symlinks);

    let summary = BackupEngine::new(config).run()?;

    if let Some(path) = args.summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        tokio::fs::write(&path, json).await?;
        println!("Summary written to: {}", path.display());
    }

    if summary.has_failures() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
