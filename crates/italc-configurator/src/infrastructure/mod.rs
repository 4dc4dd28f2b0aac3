//! Infrastructure layer for the configurator.
//!
//! Contains OS-facing adapters: the local configuration backend on disk,
//! platform system information, log file discovery, and the console front end.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `italc_config_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`storage`** – TOML-backed [`ConfigurationBackend`] stored in the
//!   platform config directory.
//!
//! - **`system_info`** – OS-specific [`SystemInfoProvider`] implementations.
//!   The correct one is selected at compile time using `#[cfg(target_os)]`.
//!   A `MockSystemInfo` is also provided for tests.
//!
//! - **`log_files`** – Scans directories for `Italc*.log` files.
//!
//! - **`console`** – Line-based dialogs, a configuration summary page, and
//!   the interactive command loop that drives the main window.
//!
//! [`ConfigurationBackend`]: crate::application::settings_controller::ConfigurationBackend
//! [`SystemInfoProvider`]: crate::application::bug_report::SystemInfoProvider

pub mod console;
pub mod log_files;
pub mod storage;
pub mod system_info;
