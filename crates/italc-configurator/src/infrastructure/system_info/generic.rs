//! System information for platforms without a dedicated probe, via `sysinfo`.

use sysinfo::System;

use super::BUILD_TYPE;
use crate::application::bug_report::SystemInfoProvider;

pub struct GenericSystemInfo;

impl GenericSystemInfo {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericSystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoProvider for GenericSystemInfo {
    fn os_description(&self) -> String {
        System::long_os_version().unwrap_or_default()
    }

    fn machine_info(&self) -> String {
        format!(
            "{} {}",
            System::host_name().unwrap_or_default(),
            System::kernel_version().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    fn build_type(&self) -> String {
        BUILD_TYPE.to_string()
    }
}
