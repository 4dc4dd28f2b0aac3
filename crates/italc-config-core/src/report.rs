//! Bug report document types.
//!
//! A bug report is one JSON document with three top-level groups:
//!
//! ```json
//! {
//!   "General": {
//!     "OS": "Linux\nDISTRIB_ID=Ubuntu ...",
//!     "MachineInfo": "Linux host 6.1.0 ... x86_64 GNU/Linux",
//!     "BuildType": "x86_64",
//!     "Version": "0.1.0"
//!   },
//!   "Configuration": { "Logging": { ... }, ... },
//!   "LogFiles": { "ItalcCoreServer": "<base64 of compressed log>" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::configuration::Configuration;

/// Machine and build description stored under `General`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "MachineInfo")]
    pub machine_info: String,
    /// One of `"x86"`, `"x86_64"` or `"unknown"`.
    #[serde(rename = "BuildType")]
    pub build_type: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// The complete diagnostic document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugReport {
    #[serde(rename = "General")]
    pub general: GeneralInfo,
    #[serde(rename = "Configuration")]
    pub configuration: Configuration,
    /// Log base name to base64-encoded, compressed contents.
    #[serde(rename = "LogFiles", default)]
    pub log_files: BTreeMap<String, String>,
}

impl BugReport {
    pub fn log_file_count(&self) -> usize {
        self.log_files.len()
    }
}
