//! italc-configurator library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the configurator do?
//!
//! Every iTALC component (service, master, client tools) reads its settings
//! from the machine's local configuration backend.  The configurator is the
//! administrator's window onto that backend:
//!
//! 1. It builds the effective configuration from the built-in defaults and
//!    the local backend, and flags when the local backend is incomplete.
//! 2. It lets the administrator edit values, load settings from a JSON file,
//!    save them to one, and apply (commit) them to the local backend.
//! 3. It assembles a bug report archive: OS information, the current
//!    configuration, and every `Italc*.log` file, compressed and encoded.
//! 4. It refuses to close with unapplied changes unless the operator confirms.

/// Application layer: settings lifecycle, bug report assembly, window shell.
pub mod application;

/// Infrastructure layer: local backend storage, system info, log files, console.
pub mod infrastructure;
