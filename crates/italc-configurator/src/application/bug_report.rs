//! ArchiveBuilder: assembles the bug report archive and writes it to disk.
//!
//! The archive is a single JSON document (see [`italc_config_core::report`])
//! built completely in memory and then flushed with one atomic write:
//!
//! ```text
//! SystemInfoProvider ──► General { OS, MachineInfo, BuildType, Version }
//! Configuration      ──► Configuration { ... full snapshot ... }
//! LogFileSource      ──► LogFiles { <base name>: base64(compress(contents)) }
//!                              │
//!                              ▼
//!                     JsonStore::flush_document(output.json)
//! ```
//!
//! Log files are gathered from the configured log directory (after path
//! variable expansion) plus any extra directories supplied at construction,
//! which in production is the platform temp directory.  Missing directories
//! simply contribute no files.

use std::path::{Path, PathBuf};

use italc_config_core::domain::paths::PathVariables;
use italc_config_core::{
    encode_log, with_json_extension, BugReport, CodecError, Configuration, ExtensionCheck,
    GeneralInfo, JsonStore, StoreError, APPLICATION_NAME, VERSION,
};
use thiserror::Error;
use tracing::{debug, info};

/// Error type for log file collection.
#[derive(Debug, Error)]
pub enum LogFileError {
    /// A matching log file exists but could not be read.
    #[error("could not read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error type for bug report generation.
#[derive(Debug, Error)]
pub enum BugReportError {
    #[error(transparent)]
    LogFile(#[from] LogFileError),

    /// A log file could not be compressed.
    #[error("could not encode log file {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: CodecError,
    },

    /// The finished document could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Describes the machine the configurator runs on.
#[cfg_attr(test, mockall::automock)]
pub trait SystemInfoProvider {
    /// Operating system name and version details.
    fn os_description(&self) -> String;

    /// Processor or kernel identification string.
    fn machine_info(&self) -> String;

    /// Architecture label fixed at build time: `x86`, `x86_64` or `unknown`.
    fn build_type(&self) -> String;
}

/// One log file read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// File name up to its first `.`; the key under `LogFiles`.
    pub base_name: String,
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Finds and reads the iTALC log files in a set of directories.
#[cfg_attr(test, mockall::automock)]
pub trait LogFileSource {
    /// Returns every matching log file in `directories`, in directory order.
    ///
    /// # Errors
    ///
    /// Returns [`LogFileError::Read`] if a matching file cannot be read.
    fn collect(&self, directories: &[PathBuf]) -> Result<Vec<LogFile>, LogFileError>;
}

/// Outcome of a successful [`ArchiveBuilder::build_and_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugReportSummary {
    pub path: PathBuf,
    pub log_file_count: usize,
}

impl BugReportSummary {
    pub fn confirmation_title(&self) -> String {
        format!("{APPLICATION_NAME} bug report archive saved")
    }

    /// Operator-facing confirmation naming the output path and the exact
    /// number of included log files.
    pub fn confirmation_text(&self) -> String {
        let logs = match self.log_file_count {
            1 => "1 log file".to_string(),
            n => format!("{n} log files"),
        };
        format!(
            "An {APPLICATION_NAME} bug report archive has been saved to {}. \
             It includes {logs} and information about your operating system. \
             You can attach it to a bug report.",
            self.path.display()
        )
    }
}

/// Builds bug report archives from injected system probes and log sources.
pub struct ArchiveBuilder {
    system_info: Box<dyn SystemInfoProvider>,
    log_source: Box<dyn LogFileSource>,
    extra_log_directories: Vec<PathBuf>,
    path_variables: PathVariables,
}

impl ArchiveBuilder {
    pub fn new(
        system_info: Box<dyn SystemInfoProvider>,
        log_source: Box<dyn LogFileSource>,
        extra_log_directories: Vec<PathBuf>,
    ) -> Self {
        Self {
            system_info,
            log_source,
            extra_log_directories,
            path_variables: PathVariables::from_environment(),
        }
    }

    /// Replaces the variables used to expand the configured log directory.
    pub fn with_path_variables(mut self, path_variables: PathVariables) -> Self {
        self.path_variables = path_variables;
        self
    }

    /// Directories searched for log files, configured directory first.
    pub fn log_directories(&self, config: &Configuration) -> Vec<PathBuf> {
        let configured = self.path_variables.expand(&config.log_file_directory());
        std::iter::once(PathBuf::from(configured))
            .chain(self.extra_log_directories.iter().cloned())
            .collect()
    }

    /// Assembles the complete document in memory.
    ///
    /// Log files sharing a base name overwrite earlier ones, so a directory
    /// listed twice contributes each file once.
    pub fn build(&self, config: &Configuration) -> Result<BugReport, BugReportError> {
        let general = GeneralInfo {
            os: self.system_info.os_description(),
            machine_info: self.system_info.machine_info(),
            build_type: self.system_info.build_type(),
            version: VERSION.to_string(),
        };

        let mut report = BugReport {
            general,
            configuration: config.clone(),
            log_files: Default::default(),
        };

        let directories = self.log_directories(config);
        for log in self.log_source.collect(&directories)? {
            let encoded = encode_log(&log.contents).map_err(|source| BugReportError::Encode {
                name: log.base_name.clone(),
                source,
            })?;
            debug!(
                "including {} ({} bytes, {} encoded)",
                log.path.display(),
                log.contents.len(),
                encoded.len()
            );
            report.log_files.insert(log.base_name, encoded);
        }

        Ok(report)
    }

    /// Builds the archive and writes it to `output`, appending `.json` unless
    /// `output` already ends in exactly `.json`.
    pub fn build_and_save(
        &self,
        output: &Path,
        config: &Configuration,
    ) -> Result<BugReportSummary, BugReportError> {
        let path = with_json_extension(output, ExtensionCheck::CaseSensitive);
        let report = self.build(config)?;

        JsonStore::new(&path).flush_document(&report)?;

        let summary = BugReportSummary {
            path,
            log_file_count: report.log_file_count(),
        };
        info!(
            "bug report archive written to {} with {} log file(s)",
            summary.path.display(),
            summary.log_file_count
        );
        Ok(summary)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use italc_config_core::decode_log;
    use serde_json::json;

    fn fixed_vars() -> PathVariables {
        PathVariables {
            home: "/home/admin".to_string(),
            personal_config: "/home/admin/.italc".to_string(),
            system_config: "/etc/italc".to_string(),
            temp: "/var/tmp".to_string(),
        }
    }

    fn system_info() -> MockSystemInfoProvider {
        let mut info = MockSystemInfoProvider::new();
        info.expect_os_description()
            .returning(|| "Linux\nDISTRIB_ID=Debian".to_string());
        info.expect_machine_info()
            .returning(|| "Linux lab-01 6.1.0 x86_64".to_string());
        info.expect_build_type().returning(|| "x86_64".to_string());
        info
    }

    fn log_source(logs: Vec<LogFile>) -> MockLogFileSource {
        let mut source = MockLogFileSource::new();
        source
            .expect_collect()
            .returning(move |_| Ok(logs.clone()));
        source
    }

    fn log(name: &str, contents: &str) -> LogFile {
        LogFile {
            base_name: name.to_string(),
            path: PathBuf::from(format!("/var/tmp/{name}.log")),
            contents: contents.as_bytes().to_vec(),
        }
    }

    fn builder(logs: Vec<LogFile>) -> ArchiveBuilder {
        ArchiveBuilder::new(
            Box::new(system_info()),
            Box::new(log_source(logs)),
            vec![PathBuf::from("/tmp")],
        )
        .with_path_variables(fixed_vars())
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("italc_report_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_log_directories_expand_configured_directory_first() {
        let builder = builder(Vec::new());
        let config = Configuration::from_value(json!({
            "Logging": { "LogFileDirectory": "$TEMP/italc" }
        }))
        .unwrap();

        assert_eq!(
            builder.log_directories(&config),
            vec![PathBuf::from("/var/tmp/italc"), PathBuf::from("/tmp")]
        );
    }

    #[test]
    fn test_build_fills_general_group() {
        // Arrange
        let builder = builder(Vec::new());

        // Act
        let report = builder.build(&Configuration::new()).expect("build");

        // Assert
        assert_eq!(report.general.os, "Linux\nDISTRIB_ID=Debian");
        assert_eq!(report.general.machine_info, "Linux lab-01 6.1.0 x86_64");
        assert_eq!(report.general.build_type, "x86_64");
        assert_eq!(report.general.version, VERSION);
    }

    #[test]
    fn test_build_embeds_configuration_snapshot() {
        let config = Configuration::from_value(json!({ "Network": { "CoreServerPort": 11100 } }))
            .unwrap();
        let report = builder(Vec::new()).build(&config).expect("build");
        assert_eq!(report.configuration, config);
    }

    #[test]
    fn test_build_encodes_each_log_under_its_base_name() {
        let report = builder(vec![log("ItalcCoreServer", "started\n"), log("ItalcService", "up\n")])
            .build(&Configuration::new())
            .expect("build");

        assert_eq!(report.log_file_count(), 2);
        let decoded = decode_log(&report.log_files["ItalcCoreServer"]).expect("decode");
        assert_eq!(decoded, b"started\n");
    }

    #[test]
    fn test_build_duplicate_base_names_keep_last_file() {
        let report = builder(vec![log("ItalcService", "first"), log("ItalcService", "second")])
            .build(&Configuration::new())
            .expect("build");

        assert_eq!(report.log_file_count(), 1);
        let decoded = decode_log(&report.log_files["ItalcService"]).expect("decode");
        assert_eq!(decoded, b"second");
    }

    #[test]
    fn test_build_and_save_without_logs_writes_empty_log_group() {
        // Arrange
        let dir = temp_dir();

        // Act
        let summary = builder(Vec::new())
            .build_and_save(&dir.join("report"), &Configuration::new())
            .expect("save");

        // Assert
        assert_eq!(summary.path, dir.join("report.json"));
        assert_eq!(summary.log_file_count, 0);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.path).unwrap()).unwrap();
        assert_eq!(written["LogFiles"], json!({}));
        assert_eq!(written["General"]["BuildType"], json!("x86_64"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_build_and_save_appends_json_to_uppercase_extension() {
        let dir = temp_dir();
        let summary = builder(Vec::new())
            .build_and_save(&dir.join("report.JSON"), &Configuration::new())
            .expect("save");
        assert_eq!(summary.path, dir.join("report.JSON.json"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_build_and_save_aborts_when_log_file_unreadable() {
        // Arrange
        let dir = temp_dir();
        let mut source = MockLogFileSource::new();
        source.expect_collect().returning(|_| {
            Err(LogFileError::Read {
                path: PathBuf::from("/tmp/ItalcService.log"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });
        let builder = ArchiveBuilder::new(Box::new(system_info()), Box::new(source), Vec::new())
            .with_path_variables(fixed_vars());

        // Act
        let result = builder.build_and_save(&dir.join("report.json"), &Configuration::new());

        // Assert
        assert!(matches!(result, Err(BugReportError::LogFile(_))));
        assert!(!dir.join("report.json").exists(), "no partial archive may be written");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_build_and_save_into_missing_directory_fails() {
        let result = builder(Vec::new())
            .build_and_save(Path::new("/nonexistent/dir/report"), &Configuration::new());
        assert!(matches!(result, Err(BugReportError::Store(_))));
    }

    #[test]
    fn test_confirmation_text_counts_log_files_exactly() {
        let one = BugReportSummary {
            path: PathBuf::from("/home/admin/report.json"),
            log_file_count: 1,
        };
        let none = BugReportSummary {
            path: PathBuf::from("/home/admin/report.json"),
            log_file_count: 0,
        };

        assert!(one.confirmation_text().contains("includes 1 log file and"));
        assert!(none.confirmation_text().contains("includes 0 log files and"));
        assert!(one.confirmation_text().contains("/home/admin/report.json"));
        assert_eq!(one.confirmation_title(), "iTALC bug report archive saved");
    }
}
