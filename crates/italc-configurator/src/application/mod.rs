//! Application layer use cases for the configurator.
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** the configuration object and its stores to fulfil an
//!   operator action (apply, reset, load, save, generate a bug report).
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the backend, the system probes and the dialogs can be swapped in tests.
//! - **Contain no platform-specific calls**; those live in `infrastructure`.
//!
//! # Sub-modules
//!
//! - **`settings_controller`** – Owns the configuration snapshot and its
//!   dirty flag; merges defaults with the local backend, applies, resets,
//!   loads and saves.
//!
//! - **`bug_report`** – Collects system information, the configuration and
//!   the log files into one document and writes it to disk.
//!
//! - **`main_window`** – Binds operator actions to the two use cases above
//!   and gates closing on unsaved changes.

pub mod bug_report;
pub mod main_window;
pub mod settings_controller;
