//! Storage infrastructure: the local configuration backend.
//!
//! This module provides a thin adapter between the settings controller and
//! the file system.  The `local_backend` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate directory.
//! - Committing the applied configuration back to disk.
//! - Reporting an empty configuration when the file does not exist yet (first run).

pub mod local_backend;
