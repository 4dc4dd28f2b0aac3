//! Windows system information from `sysinfo` and the processor environment.

use sysinfo::System;

use super::BUILD_TYPE;
use crate::application::bug_report::SystemInfoProvider;

/// Windows implementation of [`SystemInfoProvider`].
pub struct WindowsSystemInfo;

impl WindowsSystemInfo {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsSystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoProvider for WindowsSystemInfo {
    /// e.g. `Windows 10 Pro (19045)`.
    fn os_description(&self) -> String {
        let name = System::long_os_version().unwrap_or_default();
        match System::kernel_version() {
            Some(build) => format!("{name} ({build})"),
            None => name,
        }
    }

    /// The `PROCESSOR_IDENTIFIER` environment variable, e.g.
    /// `Intel64 Family 6 Model 158 Stepping 10, GenuineIntel`.
    fn machine_info(&self) -> String {
        std::env::var("PROCESSOR_IDENTIFIER").unwrap_or_default()
    }

    fn build_type(&self) -> String {
        BUILD_TYPE.to_string()
    }
}
