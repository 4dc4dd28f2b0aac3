//! JSON file store for configuration trees and serializable documents.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::configuration::{Configuration, ConfigurationError};

const JSON_EXTENSION: &str = ".json";

/// Error type for JSON store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content was not valid JSON, or a document failed to serialize.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON document was valid but not a configuration object.
    #[error("{path} does not hold a configuration: {source}")]
    NotAConfiguration {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}

/// How [`with_json_extension`] decides whether a path already ends in `.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionCheck {
    /// `report.JSON` counts as having the extension.
    CaseInsensitive,
    /// Only a literal lowercase `.json` suffix counts.
    CaseSensitive,
}

/// Appends `.json` to `path` unless it already ends with it under `check`.
///
/// Settings files use [`ExtensionCheck::CaseInsensitive`]; bug reports use
/// [`ExtensionCheck::CaseSensitive`], so `report.JSON` becomes
/// `report.JSON.json` for a bug report but stays unchanged for settings.
pub fn with_json_extension(path: &Path, check: ExtensionCheck) -> PathBuf {
    let text = path.to_string_lossy();
    let has_extension = match check {
        ExtensionCheck::CaseSensitive => text.ends_with(JSON_EXTENSION),
        ExtensionCheck::CaseInsensitive => text.to_lowercase().ends_with(JSON_EXTENSION),
    };

    if has_extension {
        path.to_path_buf()
    } else {
        let mut extended = path.as_os_str().to_os_string();
        extended.push(JSON_EXTENSION);
        PathBuf::from(extended)
    }
}

/// A JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the file as a configuration tree.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be read,
    /// [`StoreError::Json`] for malformed JSON and
    /// [`StoreError::NotAConfiguration`] when the top level is not an object.
    pub fn load(&self) -> Result<Configuration, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        let cfg = Configuration::from_value(value).map_err(|source| {
            StoreError::NotAConfiguration {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!("loaded {} settings from {}", cfg.key_count(), self.path.display());
        Ok(cfg)
    }

    /// Loads the file and merges it on top of `config`.
    ///
    /// `config` is left untouched when loading fails.
    pub fn load_into(&self, config: &mut Configuration) -> Result<(), StoreError> {
        let loaded = self.load()?;
        *config += &loaded;
        Ok(())
    }

    /// Writes `config` as pretty-printed JSON, replacing the file atomically.
    pub fn flush(&self, config: &Configuration) -> Result<(), StoreError> {
        self.flush_document(config)
    }

    /// Serializes any document and replaces the file atomically.
    pub fn flush_document<T: Serialize + ?Sized>(&self, document: &T) -> Result<(), StoreError> {
        let mut content =
            serde_json::to_vec_pretty(document).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        content.push(b'\n');
        write_atomically(&self.path, &content)
    }
}

/// Writes `bytes` to a uniquely named sibling temp file and renames it over `path`.
///
/// The temp file is removed again if the rename fails.
///
/// # Errors
///
/// Returns [`StoreError::Io`] naming whichever path failed.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    std::fs::write(&temp_path, bytes).map_err(|source| StoreError::Io {
        path: temp_path.clone(),
        source,
    })?;

    if let Err(source) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
