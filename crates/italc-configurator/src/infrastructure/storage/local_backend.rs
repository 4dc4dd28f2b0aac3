//! TOML-based local configuration backend.
//!
//! Reads and writes the machine's applied iTALC configuration to the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\iTALC\italc.toml`
//! - Linux:    `~/.config/italc/italc.toml`
//! - macOS:    `~/Library/Application Support/iTALC/italc.toml`
//!
//! The file mirrors the group structure of the configuration tree:
//!
//! ```toml
//! [Logging]
//! LogLevel = 4
//! LogFileDirectory = "$TEMP"
//!
//! [Network]
//! CoreServerPort = 11100
//! ```
//!
//! A missing file is not an error; it loads as an empty configuration so the
//! settings controller falls back to the defaults and flags the local
//! configuration as incomplete.

use std::path::{Path, PathBuf};

use italc_config_core::store::json_store::write_atomically;
use italc_config_core::{Configuration, ConfigurationError, StoreError};
use thiserror::Error;
use tracing::{debug, error};

use crate::application::settings_controller::{BackendError, ConfigurationBackend};

const CONFIG_FILE_NAME: &str = "italc.toml";

/// Error type for local backend file operations.
#[derive(Debug, Error)]
pub enum LocalBackendError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The parsed TOML could not be converted into a configuration tree.
    #[error("failed to convert config: {0}")]
    Convert(#[from] serde_json::Error),

    #[error(transparent)]
    NotAConfiguration(#[from] ConfigurationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The applied configuration stored on this machine.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    path: PathBuf,
}

impl LocalBackend {
    /// Uses the configuration file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the configuration file in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`LocalBackendError::NoPlatformConfigDir`] if the base directory
    /// cannot be determined.
    pub fn platform_default() -> Result<Self, LocalBackendError> {
        Ok(Self::new(config_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration, returning an empty one if the file does not
    /// yet exist.
    ///
    /// # Errors
    ///
    /// Returns [`LocalBackendError::Io`] for file-system errors other than
    /// "not found", and [`LocalBackendError::Parse`] if the TOML is malformed.
    pub fn read(&self) -> Result<Configuration, LocalBackendError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no local configuration at {}", self.path.display());
                return Ok(Configuration::new());
            }
            Err(source) => {
                return Err(LocalBackendError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table: toml::Table = toml::from_str(&content)?;
        let cfg = Configuration::from_value(serde_json::to_value(table)?)?;
        Ok(cfg)
    }

    /// Persists `config`, creating the config directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LocalBackendError::Serialize`] for values TOML cannot
    /// represent, such as `null` or integers above `i64::MAX`, and
    /// [`LocalBackendError::Io`] or [`LocalBackendError::Store`] for
    /// file-system failures.
    pub fn write(&self, config: &Configuration) -> Result<(), LocalBackendError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| LocalBackendError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let value = toml::Value::try_from(config)?;
        let content = toml::to_string_pretty(&value)?;
        write_atomically(&self.path, content.as_bytes())?;
        debug!("committed {} values to {}", config.key_count(), self.path.display());
        Ok(())
    }
}

impl ConfigurationBackend for LocalBackend {
    fn load(&self) -> Result<Configuration, BackendError> {
        self.read()
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.path.display())))
    }

    fn commit(&self, config: &Configuration) -> Result<(), BackendError> {
        self.write(config).map_err(|e| {
            error!("could not write local configuration {}: {e}", self.path.display());
            BackendError::Rejected(e.to_string())
        })
    }
}

// ── Config directory ──────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`LocalBackendError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, LocalBackendError> {
    platform_config_dir().ok_or(LocalBackendError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, LocalBackendError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolves the platform config base directory including the `iTALC` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("iTALC"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(base.join("italc"))
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support").join("iTALC"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        dirs::config_dir().map(|d| d.join("italc"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("italc_backend_test_{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME)
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_read_returns_empty_configuration_when_file_absent() {
        let backend = LocalBackend::new("/nonexistent/path/that/cannot/exist/italc.toml");
        let cfg = backend.read().expect("absent file is not an error");
        assert!(cfg.is_empty());
    }

    #[test]
    fn test_write_then_read_round_trips_groups() {
        // Arrange
        let path = temp_path();
        let backend = LocalBackend::new(&path);
        let cfg = Configuration::from_value(json!({
            "Logging": { "LogLevel": 6, "LogFileDirectory": "$TEMP" },
            "Network": { "CoreServerPort": 11100, "FirewallExceptionEnabled": true }
        }))
        .unwrap();

        // Act
        backend.write(&cfg).expect("write");
        let restored = backend.read().expect("read");

        // Assert
        assert_eq!(restored.value("LogLevel", "Logging"), Some(&json!(6)));
        assert_eq!(restored.value("CoreServerPort", "Network"), Some(&json!(11100)));
        assert_eq!(restored.key_count(), cfg.key_count());

        cleanup(&path);
    }

    #[test]
    fn test_write_then_read_preserves_group_and_key_order() {
        let path = temp_path();
        let backend = LocalBackend::new(&path);
        let cfg = Configuration::from_value(json!({
            "Zeta": { "b": 1, "a": 2 },
            "Alpha": { "z": 1 }
        }))
        .unwrap();

        backend.write(&cfg).expect("write");
        let restored = backend.read().expect("read");

        let groups: Vec<&str> = restored.data().keys().map(String::as_str).collect();
        assert_eq!(groups, ["Zeta", "Alpha"]);
        let zeta: Vec<&str> = restored.data()["Zeta"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(zeta, ["b", "a"]);

        cleanup(&path);
    }

    #[test]
    fn test_write_creates_missing_config_directory() {
        let path = temp_path();
        assert!(!path.parent().unwrap().exists());

        LocalBackend::new(&path)
            .write(&Configuration::new())
            .expect("write");

        assert!(path.exists());
        cleanup(&path);
    }

    #[test]
    fn test_read_invalid_toml_returns_parse_error() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = LocalBackend::new(&path).read();

        assert!(matches!(result, Err(LocalBackendError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_commit_rejects_values_toml_cannot_hold() {
        let path = temp_path();
        let mut cfg = Configuration::new();
        cfg.set_value("Unset", serde_json::Value::Null, "Service");

        let result = LocalBackend::new(&path).commit(&cfg);

        assert!(matches!(result, Err(BackendError::Rejected(_))));
        cleanup(&path);
    }

    #[test]
    fn test_write_rejects_integers_beyond_i64() {
        let path = temp_path();
        let mut cfg = Configuration::new();
        cfg.set_value("Big", u64::MAX, "Service");

        let result = LocalBackend::new(&path).write(&cfg);

        assert!(matches!(result, Err(LocalBackendError::Serialize(_))));
        assert!(!path.exists());
        cleanup(&path);
    }

    #[test]
    fn test_load_maps_parse_failure_to_unavailable() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "= broken").unwrap();

        let result = ConfigurationBackend::load(&LocalBackend::new(&path));

        assert!(matches!(result, Err(BackendError::Unavailable(_))));
        cleanup(&path);
    }

    #[test]
    fn test_platform_config_dir_returns_some_on_this_platform() {
        // Only asserted when the relevant environment is available; stripped
        // CI containers may lack HOME.
        let result = platform_config_dir();
        #[cfg(target_os = "windows")]
        if std::env::var_os("APPDATA").is_some() {
            assert!(result.is_some());
        }
        #[cfg(target_os = "linux")]
        if std::env::var_os("XDG_CONFIG_HOME").is_some() || dirs::home_dir().is_some() {
            assert!(result.is_some());
        }
        #[cfg(not(any(target_os = "windows", target_os = "linux")))]
        let _ = result;
    }

    #[test]
    fn test_config_file_path_ends_with_italc_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with(CONFIG_FILE_NAME),
                "config file must be named {CONFIG_FILE_NAME}, got {path:?}"
            );
        }
    }
}
