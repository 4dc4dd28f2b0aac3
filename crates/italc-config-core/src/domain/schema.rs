//! Built-in default configuration and typed accessors for well-known keys.

use serde_json::{json, Value};

use super::configuration::Configuration;

/// Product name used in window titles, dialogs and the bug report.
pub const APPLICATION_NAME: &str = "iTALC";

/// Version string written into the bug report's `General/Version` entry.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const LOGGING_GROUP: &str = "Logging";
pub const LOG_FILE_DIRECTORY_KEY: &str = "LogFileDirectory";
pub const LOG_LEVEL_KEY: &str = "LogLevel";

const DEFAULT_LOG_FILE_DIRECTORY: &str = "$TEMP";
const DEFAULT_LOG_LEVEL: u64 = 4;

/// Returns the default layer that every effective configuration starts from.
pub fn default_configuration() -> Configuration {
    let defaults = json!({
        "Logging": {
            "LogLevel": DEFAULT_LOG_LEVEL,
            "LogFileSizeLimitEnabled": false,
            "LogFileSizeLimit": 100,
            "LogFileDirectory": DEFAULT_LOG_FILE_DIRECTORY,
            "LogToStdErr": true,
            "LogToWindowsEventLog": false
        },
        "Network": {
            "CoreServerPort": 11100,
            "DemoServerPort": 11400,
            "FirewallExceptionEnabled": true
        },
        "Service": {
            "Autostart": true,
            "Arguments": ""
        },
        "Authentication": {
            "KeyAuthenticationEnabled": true,
            "LogonAuthenticationEnabled": true,
            "PrivateKeyBaseDir": "$GLOBALAPPDATA/keys/private",
            "PublicKeyBaseDir": "$GLOBALAPPDATA/keys/public"
        },
        "VNC": {
            "CaptureLayeredWindows": true,
            "PollFullScreen": true,
            "LowAccuracy": true
        }
    });

    match defaults {
        Value::Object(data) => Configuration::from_data(data),
        _ => Configuration::new(),
    }
}

impl Configuration {
    /// Directory the iTALC components write their log files into.
    ///
    /// May contain path variables; see [`crate::domain::paths::expand`].
    pub fn log_file_directory(&self) -> String {
        self.value(LOG_FILE_DIRECTORY_KEY, LOGGING_GROUP)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LOG_FILE_DIRECTORY)
            .to_string()
    }

    /// Numeric log level, 0 (nothing) through 6 (debug).
    pub fn log_level(&self) -> u64 {
        self.value(LOG_LEVEL_KEY, LOGGING_GROUP)
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
