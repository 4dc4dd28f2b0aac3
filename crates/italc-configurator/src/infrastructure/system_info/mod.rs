//! Platform system information for bug reports.
//!
//! Each platform implements [`SystemInfoProvider`]; the correct one is
//! selected at compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeSystemInfo`:
//!
//! | Module    | OS      | Sources                                          |
//! |-----------|---------|--------------------------------------------------|
//! | `windows` | Windows | `sysinfo` OS version + `PROCESSOR_IDENTIFIER`    |
//! | `linux`   | Linux   | `/etc/lsb-release` + `uname -a`                  |
//! | `generic` | other   | `sysinfo` OS and kernel version                  |
//!
//! None of the probes fail: information that cannot be gathered is reported
//! as an empty string, and the bug report is still written.
//!
//! A [`MockSystemInfo`] is always compiled (not guarded by `#[cfg]`) so tests
//! on any platform get deterministic values.

use crate::application::bug_report::SystemInfoProvider;

/// Architecture label of this build.
#[cfg(target_arch = "x86")]
pub const BUILD_TYPE: &str = "x86";

#[cfg(target_arch = "x86_64")]
pub const BUILD_TYPE: &str = "x86_64";

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub const BUILD_TYPE: &str = "unknown";

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsSystemInfo as NativeSystemInfo;

// ── Linux implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxSystemInfo as NativeSystemInfo;

// ── Everything else ───────────────────────────────────────────────────────────

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub mod generic;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub use generic::GenericSystemInfo as NativeSystemInfo;

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A system information provider returning fixed values.
///
/// Does not make any OS calls; the values are provided at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSystemInfo {
    pub os: String,
    pub machine: String,
    pub build_type: String,
}

impl MockSystemInfo {
    /// A typical Ubuntu workstation.
    pub fn ubuntu_x86_64() -> Self {
        Self {
            os: "Linux\nDISTRIB_ID=Ubuntu\nDISTRIB_RELEASE=22.04".to_string(),
            machine: "Linux lab-pc-01 5.15.0-91-generic #101-Ubuntu SMP x86_64 GNU/Linux"
                .to_string(),
            build_type: "x86_64".to_string(),
        }
    }

    /// A machine where every probe failed.
    pub fn unknown() -> Self {
        Self {
            os: String::new(),
            machine: String::new(),
            build_type: "unknown".to_string(),
        }
    }
}

impl SystemInfoProvider for MockSystemInfo {
    fn os_description(&self) -> String {
        self.os.clone()
    }

    fn machine_info(&self) -> String {
        self.machine.clone()
    }

    fn build_type(&self) -> String {
        self.build_type.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
