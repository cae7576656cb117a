//! Validated run configuration

use crate::error::{Error, Result};
use crate::exclude::ExcludeSet;
use crate::scan::ExtensionSet;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Default retention window in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// A source root plus the namespace label its files land under inside a
/// snapshot folder.
#[derive(Debug, Clone)]
pub struct SourceDir {
    pub path: PathBuf,
    pub label: String,
}

/// Already-parsed, validated configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources: Vec<SourceDir>,
    pub backup_dir: PathBuf,
    pub extensions: ExtensionSet,
    pub excludes: ExcludeSet,
    pub retention_days: u32,
    pub dry_run: bool,
    pub delete_old: bool,
    pub follow_symlinks: bool,
}

impl RunConfig {
    /// Validate inputs and derive source labels.
    ///
    /// Missing source directories are a warning, not an error: the scanner
    /// reports them per-item so one bad root cannot block the others.
    pub fn new(
        source_dirs: Vec<PathBuf>,
        backup_dir: PathBuf,
        extensions: &[String],
        exclude: &[String],
    ) -> Result<Self> {
        if source_dirs.is_empty() {
            return Err(Error::Configuration {
                reason: "at least one source directory is required".to_string(),
            });
        }

        let extensions = ExtensionSet::new(extensions);
        if extensions.is_empty() {
            return Err(Error::Configuration {
                reason: "at least one file extension is required".to_string(),
            });
        }

        for dir in &source_dirs {
            if !dir.exists() {
                warn!("Source dir does not exist: {}", dir.display());
            }
        }

        Ok(Self {
            sources: assign_labels(source_dirs),
            backup_dir,
            extensions,
            excludes: ExcludeSet::new(exclude),
            retention_days: DEFAULT_RETENTION_DAYS,
            dry_run: false,
            delete_old: false,
            follow_symlinks: false,
        })
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_delete_old(mut self, delete_old: bool) -> Self {
        self.delete_old = delete_old;
        self
    }

    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }
}

/// Label each source root by its final path component, suffixing duplicates
/// with a counter so distinct roots never share a destination namespace.
fn assign_labels(dirs: Vec<PathBuf>) -> Vec<SourceDir> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    dirs.into_iter()
        .map(|path| {
            let base = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string());
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let label = if *count == 1 {
                base
            } else {
                format!("{base}-{count}")
            };
            SourceDir { path, label }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extensions() -> Vec<String> {
        vec![".log".to_string()]
    }

    #[test]
    fn rejects_empty_sources() {
        let result = RunConfig::new(vec![], PathBuf::from("/backups"), &extensions(), &[]);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn rejects_empty_extensions() {
        let result = RunConfig::new(
            vec![PathBuf::from("/var/log")],
            PathBuf::from("/backups"),
            &[],
            &[],
        );
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn defaults_are_conservative() {
        let config = RunConfig::new(
            vec![PathBuf::from("/var/log")],
            PathBuf::from("/backups"),
            &extensions(),
            &[],
        )
        .unwrap();
        assert_eq!(config.retention_days, DEFAULT_RETENTION_DAYS);
        assert!(!config.dry_run);
        assert!(!config.delete_old);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn labels_use_final_path_component() {
        let config = RunConfig::new(
            vec![PathBuf::from("/var/log/app"), PathBuf::from("/srv/reports")],
            PathBuf::from("/backups"),
            &extensions(),
            &[],
        )
        .unwrap();
        let labels: Vec<&str> = config.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["app", "reports"]);
    }

    #[test]
    fn duplicate_labels_are_disambiguated() {
        let config = RunConfig::new(
            vec![
                PathBuf::from("/srv/a/logs"),
                PathBuf::from("/srv/b/logs"),
                PathBuf::from("/srv/c/logs"),
            ],
            PathBuf::from("/backups"),
            &extensions(),
            &[],
        )
        .unwrap();
        let labels: Vec<&str> = config.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["logs", "logs-2", "logs-3"]);
    }
}
