//! # snapsweep
//!
//! Extension-filtered snapshot backups with retention-based cleanup.
//!
//! ## Features
//!
//! - **Scanner**: lazy recursive traversal with extension and exclusion filtering
//! - **Copy planning**: skips files already present in the snapshot with matching
//!   size and mtime, so reruns are cheap
//! - **Dry-run**: previews every action without touching the filesystem
//! - **Retention**: deletes snapshot folders older than a configurable window,
//!   keyed solely by the `YYYYMMDD_HHMMSS` folder name
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snapsweep::{BackupEngine, RunConfig};
//! use std::path::PathBuf;
//!
//! # fn main() -> snapsweep::Result<()> {
//! let config = RunConfig::new(
//!     vec![PathBuf::from("/var/log/app")],
//!     PathBuf::from("/srv/backups"),
//!     &[".log".to_string(), ".csv".to_string()],
//!     &[],
//! )?;
//! let summary = BackupEngine::new(config).run()?;
//! println!("copied {} files", summary.copied);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod copy;
pub mod engine;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod plan;
pub mod report;
pub mod retention;
pub mod scan;

// Re-export commonly used types
pub use config::{RunConfig, SourceDir, DEFAULT_RETENTION_DAYS};
pub use copy::CopyRecord;
pub use engine::BackupEngine;
pub use error::{Error, Result};
pub use report::RunSummary;
pub use retention::RetentionDecision;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
