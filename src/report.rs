//! Run accounting and summary reporting

use crate::copy::CopyRecord;
use crate::retention::RetentionDecision;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// Aggregate counters for one run.
///
/// Folded from per-file `CopyRecord`s and per-folder `RetentionDecision`s,
/// and serializable for the `--summary-json` export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// When the run started; also the snapshot folder timestamp.
    pub started: Option<DateTime<Local>>,
    /// The snapshot folder of this run.
    pub snapshot: Option<PathBuf>,
    /// Candidate files yielded by the scanner (post-exclusion).
    pub discovered: u64,
    pub copied: u64,
    pub skipped_identical: u64,
    pub excluded: u64,
    pub would_copy: u64,
    pub failed: u64,
    pub bytes_copied: u64,
    pub deleted: u64,
    pub would_delete: u64,
    pub kept: u64,
}

impl RunSummary {
    /// Fold one file outcome into the totals.
    pub fn record(&mut self, record: &CopyRecord) {
        match record {
            CopyRecord::Copied { bytes, .. } => {
                self.copied += 1;
                self.bytes_copied += *bytes;
            }
            CopyRecord::SkippedIdentical { .. } => self.skipped_identical += 1,
            CopyRecord::SkippedExcluded { .. } => self.excluded += 1,
            CopyRecord::WouldCopy { .. } => self.would_copy += 1,
            CopyRecord::Failed { .. } => self.failed += 1,
        }
    }

    /// Fold one retention outcome into the totals.
    pub fn record_retention(&mut self, decision: &RetentionDecision) {
        match decision {
            RetentionDecision::Deleted { .. } => self.deleted += 1,
            RetentionDecision::WouldDelete { .. } => self.would_delete += 1,
            RetentionDecision::Kept { .. } | RetentionDecision::KeptUnrecognized { .. } => {
                self.kept += 1
            }
            RetentionDecision::Failed { .. } => self.failed += 1,
        }
    }

    /// True when at least one per-item failure occurred.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn folds_copy_records_into_counters() {
        let mut summary = RunSummary::default();
        summary.record(&CopyRecord::Copied {
            source: PathBuf::from("/s/a.log"),
            destination: PathBuf::from("/d/a.log"),
            bytes: 100,
        });
        summary.record(&CopyRecord::Copied {
            source: PathBuf::from("/s/b.log"),
            destination: PathBuf::from("/d/b.log"),
            bytes: 50,
        });
        summary.record(&CopyRecord::SkippedIdentical {
            source: PathBuf::from("/s/c.log"),
        });
        summary.record(&CopyRecord::Failed {
            path: PathBuf::from("/s/d.log"),
            reason: "permission denied".to_string(),
        });

        assert_eq!(summary.copied, 2);
        assert_eq!(summary.bytes_copied, 150);
        assert_eq!(summary.skipped_identical, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn folds_retention_decisions_into_counters() {
        let mut summary = RunSummary::default();
        summary.record_retention(&RetentionDecision::Deleted {
            path: PathBuf::from("/b/20250101_000000"),
            age_days: 40,
        });
        summary.record_retention(&RetentionDecision::Kept {
            path: PathBuf::from("/b/20250601_000000"),
        });
        summary.record_retention(&RetentionDecision::KeptUnrecognized {
            path: PathBuf::from("/b/misc"),
        });

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.kept, 2);
        assert!(!summary.has_failures());
    }

    #[test]
    fn serializes_counters_for_export() {
        let mut summary = RunSummary::default();
        summary.discovered = 3;
        summary.copied = 2;
        summary.skipped_identical = 1;

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["discovered"], 3);
        assert_eq!(value["copied"], 2);
        assert_eq!(value["skipped_identical"], 1);
        assert_eq!(value["failed"], 0);
    }

    #[test]
    fn formats_byte_counts() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
