//! Lazy traversal of source directories with extension and exclusion filtering

use crate::config::SourceDir;
use crate::exclude::ExcludeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Case-insensitive extension filter.
///
/// Entries are normalized to lowercase with a leading dot, so `log`, `.log`
/// and `.LOG` all describe the same filter.
#[derive(Debug, Clone)]
pub struct ExtensionSet {
    suffixes: Vec<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut suffixes: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .filter(|ext| !ext.is_empty() && ext != ".")
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        suffixes.sort();
        suffixes.dedup();
        Self { suffixes }
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// True when the file's extension is in the configured set.
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => {
                let suffix = format!(".{}", ext.to_lowercase());
                self.suffixes.iter().any(|s| *s == suffix)
            }
            None => false,
        }
    }
}

/// A candidate file discovered by the scanner.
///
/// Read-only snapshot of the file's identity and metadata taken at scan time.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Source root the file was found under.
    pub source_root: PathBuf,
    /// Destination namespace label of that root.
    pub label: String,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path relative to `source_root`.
    pub relative: PathBuf,
    /// Lowercased extension including the leading dot.
    pub extension: String,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Last-modified timestamp at scan time.
    pub modified: SystemTime,
}

/// One scanner observation.
#[derive(Debug)]
pub enum ScanEvent {
    /// A file matching the extension filter and not excluded.
    Found(SourceFile),
    /// A matching file suppressed by an exclusion rule. Excluded directories
    /// are pruned without an event.
    Excluded(PathBuf),
    /// An entry that could not be read; the scan continues past it.
    Unreadable { path: PathBuf, reason: String },
}

/// Lazy, forward-only iterator over all candidate files of a run.
///
/// Source roots are visited in configuration order; within a root the order
/// is directory-tree order. Symbolic links are not followed unless
/// `follow_symlinks` is set, in which case walkdir's ancestor check reports
/// link cycles as `Unreadable` instead of recursing forever.
pub struct Scanner<'a> {
    extensions: &'a ExtensionSet,
    excludes: &'a ExcludeSet,
    follow_symlinks: bool,
    pending: std::slice::Iter<'a, SourceDir>,
    current: Option<(&'a SourceDir, walkdir::IntoIter)>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        sources: &'a [SourceDir],
        extensions: &'a ExtensionSet,
        excludes: &'a ExcludeSet,
        follow_symlinks: bool,
    ) -> Self {
        Self {
            extensions,
            excludes,
            follow_symlinks,
            pending: sources.iter(),
            current: None,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        loop {
            if self.current.is_none() {
                let source = self.pending.next()?;
                debug!("Scanning source root: {}", source.path.display());
                let walker = WalkDir::new(&source.path)
                    .follow_links(self.follow_symlinks)
                    .into_iter();
                self.current = Some((source, walker));
            }

            let Some((source, walker)) = self.current.as_mut() else {
                continue;
            };

            let entry = match walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| source.path.clone());
                    return Some(ScanEvent::Unreadable {
                        path,
                        reason: err.to_string(),
                    });
                }
                None => {
                    self.current = None;
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(&source.path) else {
                continue;
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.excludes.matches(relative) {
                    debug!("Pruning excluded directory: {}", entry.path().display());
                    walker.skip_current_dir();
                }
                continue;
            }
            if !file_type.is_file() {
                continue;
            }
            if !self.extensions.matches(entry.path()) {
                continue;
            }
            if self.excludes.matches(relative) {
                return Some(ScanEvent::Excluded(entry.path().to_path_buf()));
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    return Some(ScanEvent::Unreadable {
                        path: entry.path().to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            };
            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(err) => {
                    return Some(ScanEvent::Unreadable {
                        path: entry.path().to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            };

            let extension = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default();

            return Some(ScanEvent::Found(SourceFile {
                source_root: source.path.clone(),
                label: source.label.clone(),
                path: entry.path().to_path_buf(),
                relative: relative.to_path_buf(),
                extension,
                size: metadata.len(),
                modified,
            }));
        }
    }
}
