//! The traversal-copy-retention engine for one run

use crate::config::RunConfig;
use crate::copy::{self, CopyRecord};
use crate::error::Result;
use crate::plan::{CopyIntent, CopyPlanner};
use crate::report::{format_bytes, RunSummary};
use crate::retention;
use crate::scan::{ScanEvent, Scanner};
use chrono::{DateTime, Local};
use std::fs;
use tracing::{debug, info, span, warn, Level};

/// Drives one backup run: scan, plan, copy, then an optional retention sweep.
///
/// Execution is sequential; files are copied one at a time in scanner order,
/// and per-file failures are folded into the summary instead of aborting.
pub struct BackupEngine {
    config: RunConfig,
}

impl BackupEngine {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run with the current wall clock as the snapshot timestamp.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now())
    }

    /// Run with an explicit start timestamp.
    ///
    /// The timestamp names the snapshot folder, so pointing a second run at
    /// the same instant reuses the folder and unchanged files come back as
    /// skipped-identical instead of fresh copies.
    pub fn run_at(&self, started: DateTime<Local>) -> Result<RunSummary> {
        let snapshot_dir = self
            .config
            .backup_dir
            .join(retention::snapshot_dir_name(started));
        let span = span!(Level::INFO, "backup_run", snapshot = %snapshot_dir.display());
        let _enter = span.enter();

        info!("=== Backup run start ===");
        for source in &self.config.sources {
            info!("Source: {} (as '{}')", source.path.display(), source.label);
        }
        info!("Snapshot folder: {}", snapshot_dir.display());
        info!(
            "Dry-run: {} | Delete-old: {} | Retention days: {}",
            self.config.dry_run, self.config.delete_old, self.config.retention_days
        );

        if !self.config.dry_run {
            fs::create_dir_all(&snapshot_dir)?;
        }

        let planner = CopyPlanner::new(&snapshot_dir, self.config.dry_run);
        let scanner = Scanner::new(
            &self.config.sources,
            &self.config.extensions,
            &self.config.excludes,
            self.config.follow_symlinks,
        );

        let mut summary = RunSummary {
            started: Some(started),
            snapshot: Some(snapshot_dir.clone()),
            ..RunSummary::default()
        };

        for event in scanner {
            let record = match event {
                ScanEvent::Found(file) => {
                    summary.discovered += 1;
                    let planned = planner.plan(&file);
                    match planned.intent {
                        CopyIntent::Copy => copy::copy_file(&file, &planned.destination),
                        CopyIntent::SkipIdentical => CopyRecord::SkippedIdentical {
                            source: file.path,
                        },
                        CopyIntent::WouldCopy => CopyRecord::WouldCopy {
                            source: file.path,
                            destination: planned.destination,
                        },
                    }
                }
                ScanEvent::Excluded(path) => CopyRecord::SkippedExcluded { path },
                ScanEvent::Unreadable { path, reason } => CopyRecord::Failed { path, reason },
            };
            log_record(&record);
            summary.record(&record);
        }

        if self.config.delete_old {
            let decisions = retention::sweep(
                &self.config.backup_dir,
                self.config.retention_days,
                self.config.dry_run,
                started,
            )?;
            for decision in &decisions {
                summary.record_retention(decision);
            }
        }

        info!("=== Backup run summary ===");
        info!(
            "Discovered: {} | Copied: {} | Skipped: {} | Excluded: {} | Failed: {}",
            summary.discovered,
            summary.copied,
            summary.skipped_identical,
            summary.excluded,
            summary.failed
        );
        if self.config.dry_run {
            info!("Would copy: {}", summary.would_copy);
        }
        if self.config.delete_old {
            info!(
                "Backups deleted: {} (would delete: {})",
                summary.deleted, summary.would_delete
            );
        }
        info!(
            "Bytes copied: {} ({})",
            summary.bytes_copied,
            format_bytes(summary.bytes_copied)
        );

        Ok(summary)
    }
}

fn log_record(record: &CopyRecord) {
    match record {
        CopyRecord::Copied {
            source,
            destination,
            ..
        } => info!("Copied: {} -> {}", source.display(), destination.display()),
        CopyRecord::SkippedIdentical { source } => {
            info!("Skipped (identical): {}", source.display())
        }
        CopyRecord::SkippedExcluded { path } => {
            debug!("Skipped (excluded): {}", path.display())
        }
        CopyRecord::WouldCopy {
            source,
            destination,
        } => info!(
            "(Dry) Would copy: {} -> {}",
            source.display(),
            destination.display()
        ),
        CopyRecord::Failed { path, reason } => warn!("Failed: {}: {}", path.display(), reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn fixed_now() -> DateTime<Local> {
        Local::now().with_nanosecond(0).unwrap()
    }

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(sources: Vec<PathBuf>, backup_dir: &Path) -> RunConfig {
        RunConfig::new(
            sources,
            backup_dir.to_path_buf(),
            &[".log".to_string()],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn first_run_copies_every_matching_file() {
        let tmp = TempDir::new().unwrap();
        let src_a = tmp.path().join("srcA");
        let src_b = tmp.path().join("srcB");
        write(&src_a, "app.log", "from-a");
        write(&src_a, "deep/trace.log", "deep");
        write(&src_b, "app.log", "from-b");
        write(&src_b, "skip.txt", "not matching");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![src_a, src_b], &backup));
        let started = fixed_now();
        let summary = engine.run_at(started).unwrap();

        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.copied, 3);
        assert_eq!(summary.failed, 0);

        let snapshot = backup.join(retention::snapshot_dir_name(started));
        // Colliding relative paths land under distinct source labels.
        assert_eq!(
            fs::read_to_string(snapshot.join("srcA/app.log")).unwrap(),
            "from-a"
        );
        assert_eq!(
            fs::read_to_string(snapshot.join("srcB/app.log")).unwrap(),
            "from-b"
        );
        assert!(snapshot.join("srcA/deep/trace.log").exists());
        assert!(!snapshot.join("srcB/skip.txt").exists());
    }

    #[test]
    fn rerun_against_same_snapshot_skips_identical_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "one.log", "1");
        write(&src, "two.log", "2");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![src], &backup));
        let started = fixed_now();

        let first = engine.run_at(started).unwrap();
        let second = engine.run_at(started).unwrap();

        assert_eq!(first.copied, 2);
        assert_eq!(first.skipped_identical, 0);
        assert_eq!(second.copied, 0);
        assert_eq!(second.skipped_identical, first.copied);
    }

    #[test]
    fn changed_file_is_recopied_on_rerun() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "app.log", "version one");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![src.clone()], &backup));
        let started = fixed_now();

        engine.run_at(started).unwrap();
        write(&src, "app.log", "version two, longer");
        let second = engine.run_at(started).unwrap();

        assert_eq!(second.copied, 1);
        let snapshot = backup.join(retention::snapshot_dir_name(started));
        assert_eq!(
            fs::read_to_string(snapshot.join("src/app.log")).unwrap(),
            "version two, longer"
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "one.log", "1");
        write(&src, "two.log", "2");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![src], &backup).with_dry_run(true));
        let summary = engine.run_at(fixed_now()).unwrap();

        assert_eq!(summary.would_copy, 2);
        assert_eq!(summary.copied, 0);
        assert!(!backup.exists());

        // Repeating the dry-run reports the same counts.
        let again = engine.run_at(fixed_now()).unwrap();
        assert_eq!(again.would_copy, 2);
        assert!(!backup.exists());
    }

    #[test]
    fn exclusion_rule_keeps_subtree_out_of_snapshot() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "keep.log", "k");
        write(&src, "sub1/secret.log", "s");
        write(&src, "sub1/deeper/more.log", "m");

        let backup = tmp.path().join("backups");
        let config = RunConfig::new(
            vec![src],
            backup.clone(),
            &[".log".to_string()],
            &["sub1".to_string()],
        )
        .unwrap();
        let started = fixed_now();
        let summary = BackupEngine::new(config).run_at(started).unwrap();

        assert_eq!(summary.copied, 1);

        let snapshot = backup.join(retention::snapshot_dir_name(started));
        for entry in WalkDir::new(&snapshot) {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(&snapshot).unwrap();
            assert!(
                !relative.components().any(|c| c.as_os_str() == "sub1"),
                "snapshot contains excluded path: {}",
                relative.display()
            );
        }
    }

    #[test]
    fn unicode_names_survive_the_round_trip() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "naïve.log", "byte-for-byte");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![src], &backup));
        let started = fixed_now();
        let summary = engine.run_at(started).unwrap();

        assert_eq!(summary.copied, 1);
        let snapshot = backup.join(retention::snapshot_dir_name(started));
        assert_eq!(
            fs::read_to_string(snapshot.join("src/naïve.log")).unwrap(),
            "byte-for-byte"
        );
    }

    #[test]
    fn missing_source_root_counts_as_failure_but_run_completes() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good");
        write(&good, "app.log", "a");
        let missing = tmp.path().join("missing");

        let backup = tmp.path().join("backups");
        let engine = BackupEngine::new(config(vec![missing, good], &backup));
        let summary = engine.run_at(fixed_now()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.copied, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn delete_old_sweeps_stale_snapshots_after_copying() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "app.log", "a");

        let backup = tmp.path().join("backups");
        let started = fixed_now();
        let stale = backup.join(retention::snapshot_dir_name(
            started - Duration::days(40),
        ));
        fs::create_dir_all(&stale).unwrap();

        let engine = BackupEngine::new(
            config(vec![src], &backup)
                .with_delete_old(true)
                .with_retention_days(30),
        );
        let summary = engine.run_at(started).unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.deleted, 1);
        assert!(!stale.exists());
        // The snapshot this run just created is within the window.
        assert!(backup.join(retention::snapshot_dir_name(started)).exists());
    }

    #[test]
    fn dry_run_with_delete_old_only_reports_deletions() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src, "app.log", "a");

        let backup = tmp.path().join("backups");
        let started = fixed_now();
        let stale = backup.join(retention::snapshot_dir_name(
            started - Duration::days(40),
        ));
        fs::create_dir_all(&stale).unwrap();

        let engine = BackupEngine::new(
            config(vec![src], &backup)
                .with_dry_run(true)
                .with_delete_old(true),
        );
        let summary = engine.run_at(started).unwrap();

        assert_eq!(summary.would_copy, 1);
        assert_eq!(summary.would_delete, 1);
        assert_eq!(summary.deleted, 0);
        assert!(stale.exists());
    }
}
