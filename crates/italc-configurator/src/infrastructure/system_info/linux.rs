//! Linux system information from `/etc/lsb-release` and `uname -a`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::BUILD_TYPE;
use crate::application::bug_report::SystemInfoProvider;

const LSB_RELEASE: &str = "/etc/lsb-release";

/// Linux implementation of [`SystemInfoProvider`].
pub struct LinuxSystemInfo {
    lsb_release: PathBuf,
}

impl LinuxSystemInfo {
    pub fn new() -> Self {
        Self::with_lsb_release(LSB_RELEASE)
    }

    /// Reads the distribution description from `path` instead of the system file.
    pub fn with_lsb_release(path: impl AsRef<Path>) -> Self {
        Self {
            lsb_release: path.as_ref().to_path_buf(),
        }
    }
}

impl Default for LinuxSystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoProvider for LinuxSystemInfo {
    /// `Linux` followed by the trimmed contents of the lsb-release file.
    fn os_description(&self) -> String {
        let release = std::fs::read_to_string(&self.lsb_release).unwrap_or_else(|e| {
            debug!("could not read {}: {e}", self.lsb_release.display());
            String::new()
        });
        format!("Linux\n{}", release.trim())
    }

    fn machine_info(&self) -> String {
        match Command::new("uname").arg("-a").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim().to_string(),
            Err(e) => {
                debug!("could not run uname: {e}");
                String::new()
            }
        }
    }

    fn build_type(&self) -> String {
        BUILD_TYPE.to_string()
    }
}
