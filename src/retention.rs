//! Retention sweep over timestamped snapshot folders

use chrono::{DateTime, Duration, Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Folder-name timestamp format. The name is the only persisted metadata a
/// snapshot carries, so this encoding must stay stable.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Snapshot folder name for a run started at `started`.
pub fn snapshot_dir_name(started: DateTime<Local>) -> String {
    started.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string()
}

/// Parse a folder name as a snapshot timestamp.
pub fn parse_snapshot_name(name: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(name, SNAPSHOT_TIMESTAMP_FORMAT).ok()
}

/// Per-folder outcome of a retention sweep.
#[derive(Debug, Clone)]
pub enum RetentionDecision {
    /// Folder was older than the window and has been removed.
    Deleted { path: PathBuf, age_days: i64 },
    /// Dry-run: folder is older than the window and would be removed.
    WouldDelete { path: PathBuf, age_days: i64 },
    /// Folder is within the retention window.
    Kept { path: PathBuf },
    /// Name does not parse as a snapshot timestamp; never deleted.
    KeptUnrecognized { path: PathBuf },
    /// Deletion was attempted and failed partway.
    Failed { path: PathBuf, reason: String },
}

/// Sweep the immediate children of `backup_root`, deleting snapshot folders
/// whose name-derived age exceeds `retention_days`.
///
/// A folder aged exactly `retention_days` is kept; only strictly older ones
/// are deleted. Children whose names do not parse are kept and reported,
/// and non-directories are ignored. With `dry_run`, eligible folders are
/// reported without anything being removed.
pub fn sweep(
    backup_root: &Path,
    retention_days: u32,
    dry_run: bool,
    now: DateTime<Local>,
) -> crate::Result<Vec<RetentionDecision>> {
    let mut decisions = Vec::new();
    if !backup_root.exists() {
        return Ok(decisions);
    }

    debug!(
        "Retention sweep of {} (window: {} days)",
        backup_root.display(),
        retention_days
    );
    let cutoff = now.naive_local() - Duration::days(i64::from(retention_days));

    let mut children: Vec<PathBuf> = fs::read_dir(backup_root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    for child in children {
        let stamp = child
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_snapshot_name);
        let Some(stamp) = stamp else {
            warn!("Keeping unrecognized directory: {}", child.display());
            decisions.push(RetentionDecision::KeptUnrecognized { path: child });
            continue;
        };

        if stamp >= cutoff {
            debug!("Keeping snapshot within window: {}", child.display());
            decisions.push(RetentionDecision::Kept { path: child });
            continue;
        }

        let age_days = (now.naive_local() - stamp).num_days();
        if dry_run {
            info!("(Dry) Would delete old backup: {}", child.display());
            decisions.push(RetentionDecision::WouldDelete {
                path: child,
                age_days,
            });
        } else {
            match fs::remove_dir_all(&child) {
                Ok(()) => {
                    info!("Deleted old backup: {}", child.display());
                    decisions.push(RetentionDecision::Deleted {
                        path: child,
                        age_days,
                    });
                }
                Err(err) => {
                    warn!("Failed to delete {}: {}", child.display(), err);
                    decisions.push(RetentionDecision::Failed {
                        path: child,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    Ok(decisions)
}
