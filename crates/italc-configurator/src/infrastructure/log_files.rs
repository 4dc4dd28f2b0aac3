//! Log file discovery for bug reports.
//!
//! iTALC components write logs named `Italc<Component>.log` into the
//! configured log directory, and services started before the configuration
//! is readable fall back to the system temp directory.  The scanner collects
//! every matching regular file from a list of directories.
//!
//! [`extract_report_logs`] reverses the bug report encoding and writes the
//! archived logs back to plain `<name>.log` files.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, PatternError};
use italc_config_core::{decode_log, BugReport, CodecError};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::bug_report::{LogFile, LogFileError, LogFileSource};

/// Error type for unpacking the logs of a bug report archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read bug report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a bug report archive: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A `LogFiles` entry could not be decoded.
    #[error("log file {name} is corrupt: {source}")]
    Decode {
        name: String,
        #[source]
        source: CodecError,
    },

    /// A `LogFiles` key that is not a plain file name.
    #[error("refusing to write log file with name {0:?}")]
    UnsafeName(String),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File name pattern of iTALC log files.
pub const LOG_FILE_PATTERN: &str = "Italc*.log";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// System-wide temp directory searched in addition to the configured one.
pub fn platform_temp_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from(r"C:\Windows\Temp")
    }

    #[cfg(not(target_os = "windows"))]
    {
        PathBuf::from("/tmp")
    }
}

/// Scans directories for log files matching a file name pattern.
#[derive(Debug, Clone)]
pub struct LogDirectoryScanner {
    pattern: Pattern,
}

impl LogDirectoryScanner {
    /// Scanner for [`LOG_FILE_PATTERN`].
    pub fn new() -> Result<Self, PatternError> {
        Self::with_pattern(LOG_FILE_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
        })
    }

    /// Matching regular files directly inside `dir`, sorted by file name.
    ///
    /// A directory that does not exist or cannot be listed yields no files.
    fn matching_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("skipping log directory {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        files
    }
}

impl LogFileSource for LogDirectoryScanner {
    fn collect(&self, directories: &[PathBuf]) -> Result<Vec<LogFile>, LogFileError> {
        let mut logs = Vec::new();
        for dir in directories {
            for path in self.matching_files(dir) {
                let contents = std::fs::read(&path).map_err(|source| LogFileError::Read {
                    path: path.clone(),
                    source,
                })?;
                logs.push(LogFile {
                    base_name: base_name(&path),
                    path,
                    contents,
                });
            }
        }
        debug!("collected {} log files", logs.len());
        Ok(logs)
    }
}

/// File name up to its first `.`: `ItalcService.1.log` becomes `ItalcService`.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Decodes every `LogFiles` entry of the archive at `report_path` into
/// `<output_dir>/<name>.log`, creating `output_dir` if needed.
///
/// Returns the written paths in key order.  Every entry is decoded before
/// anything is written, so a corrupt archive leaves `output_dir` untouched.
pub fn extract_report_logs(report_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let text = std::fs::read_to_string(report_path).map_err(|source| ExtractError::Read {
        path: report_path.to_path_buf(),
        source,
    })?;
    let report: BugReport = serde_json::from_str(&text).map_err(|source| ExtractError::Parse {
        path: report_path.to_path_buf(),
        source,
    })?;

    let mut decoded = Vec::with_capacity(report.log_file_count());
    for (name, encoded) in &report.log_files {
        if Path::new(name).file_name() != Some(std::ffi::OsStr::new(name)) {
            return Err(ExtractError::UnsafeName(name.clone()));
        }
        let contents = decode_log(encoded).map_err(|source| ExtractError::Decode {
            name: name.clone(),
            source,
        })?;
        decoded.push((output_dir.join(format!("{name}.log")), contents));
    }

    std::fs::create_dir_all(output_dir).map_err(|source| ExtractError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(decoded.len());
    for (path, contents) in decoded {
        std::fs::write(&path, &contents).map_err(|source| ExtractError::Write {
            path: path.clone(),
            source,
        })?;
        info!("extracted {} ({} bytes)", path.display(), contents.len());
        written.push(path);
    }
    Ok(written)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
