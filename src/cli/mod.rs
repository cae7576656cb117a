//! Command-line interface for snapsweep.
//!
//! One module per subcommand: `backup` performs a full run, `prune` runs the
//! retention sweep on its own.

use clap::{Parser, Subcommand};

pub mod backup;
pub mod prune;

/// snapsweep - snapshot backups with retention cleanup
#[derive(Parser)]
#[command(name = "snapsweep")]
#[command(about = "Copy files by extension into timestamped snapshot folders, with optional cleanup of old snapshots")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new timestamped snapshot of the configured sources
    Backup(backup::BackupArgs),
    /// Delete snapshot folders older than the retention window
    Prune(prune::PruneArgs),
}
