//! Chunked file copy with timestamp preservation

use crate::scan::SourceFile;
use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Copy buffer size; bounds memory use independently of file size.
pub const COPY_BUFFER_SIZE: usize = 1024 * 1024;

/// Outcome of one candidate file.
#[derive(Debug, Clone)]
pub enum CopyRecord {
    Copied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    SkippedIdentical {
        source: PathBuf,
    },
    SkippedExcluded {
        path: PathBuf,
    },
    WouldCopy {
        source: PathBuf,
        destination: PathBuf,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

impl CopyRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Copy `file` to `destination`, creating missing parent directories and
/// carrying the source mtime over.
///
/// The byte stream goes through a bounded buffer into a `.partial` sibling
/// that is renamed into place once complete, so an interrupted copy never
/// leaves a half-written file under the final name. Errors come back as
/// `Failed` records; the partial file is removed on a best-effort basis.
pub fn copy_file(file: &SourceFile, destination: &Path) -> CopyRecord {
    match try_copy(file, destination) {
        Ok(bytes) => CopyRecord::Copied {
            source: file.path.clone(),
            destination: destination.to_path_buf(),
            bytes,
        },
        Err(err) => CopyRecord::Failed {
            path: file.path.clone(),
            reason: err.to_string(),
        },
    }
}

fn try_copy(file: &SourceFile, destination: &Path) -> io::Result<u64> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(destination);
    let staged = stage(&file.path, &staging, file.modified).and_then(|bytes| {
        fs::rename(&staging, destination)?;
        Ok(bytes)
    });
    if staged.is_err() {
        let _ = fs::remove_file(&staging);
    }
    staged
}

fn stage(source: &Path, staging: &Path, modified: SystemTime) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = File::create(staging)?;
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&buffer[..read])?;
        bytes += read as u64;
    }
    writer.flush()?;
    drop(writer);
    filetime::set_file_mtime(staging, FileTime::from_system_time(modified))?;
    Ok(bytes)
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("copy"));
    name.push(".partial");
    destination.with_file_name(name)
}
