//! Copy decision logic against an existing snapshot tree

use crate::scan::SourceFile;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIntent {
    /// Destination missing or different; copy, overwriting on difference.
    Copy,
    /// Destination already holds an identical copy (size + mtime).
    SkipIdentical,
    /// Dry-run: the file would be copied.
    WouldCopy,
}

/// A planned destination and the action decided for it.
#[derive(Debug, Clone)]
pub struct PlannedCopy {
    pub destination: PathBuf,
    pub intent: CopyIntent,
}

/// Maps candidates into the snapshot tree and decides copy vs skip.
#[derive(Debug)]
pub struct CopyPlanner {
    snapshot_dir: PathBuf,
    dry_run: bool,
}

impl CopyPlanner {
    pub fn new(snapshot_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            dry_run,
        }
    }

    /// Destination path: snapshot folder / source label / relative path.
    ///
    /// The per-source label keeps roots that share relative paths from
    /// colliding inside one snapshot.
    pub fn destination(&self, file: &SourceFile) -> PathBuf {
        self.snapshot_dir.join(&file.label).join(&file.relative)
    }

    pub fn plan(&self, file: &SourceFile) -> PlannedCopy {
        let destination = self.destination(file);
        let intent = if identical(file, &destination) {
            CopyIntent::SkipIdentical
        } else if self.dry_run {
            CopyIntent::WouldCopy
        } else {
            CopyIntent::Copy
        };
        PlannedCopy {
            destination,
            intent,
        }
    }
}

/// Quick equality check: size plus whole-second mtime.
///
/// Any stat failure counts as "differs" so the copy path makes the final
/// call; sub-second precision is ignored because not every filesystem
/// preserves it.
fn identical(file: &SourceFile, destination: &Path) -> bool {
    let metadata = match fs::metadata(destination) {
        Ok(metadata) => metadata,
        Err(_) => return false,
    };
    if !metadata.is_file() || metadata.len() != file.size {
        return false;
    }
    let source_mtime = FileTime::from_system_time(file.modified);
    let destination_mtime = FileTime::from_last_modification_time(&metadata);
    source_mtime.unix_seconds() == destination_mtime.unix_seconds()
}
