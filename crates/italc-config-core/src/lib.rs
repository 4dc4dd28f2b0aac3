//! # italc-config-core
//!
//! Shared library for the iTALC configurator containing the configuration
//! object, the default settings schema, the JSON settings store, the log
//! compression codec, and the bug report document types.
//!
//! It has no dependency on UI toolkits or platform-specific system APIs;
//! the only OS contact is plain file I/O in [`store`] and directory lookup
//! in [`domain::paths`].
//!
//! # Architecture overview
//!
//! The configurator lets an administrator review, edit, load, save, and
//! apply the settings that every iTALC component reads at startup.  This
//! crate is the foundation the configurator application builds on:
//!
//! - **`domain`** – The [`Configuration`] tree with its layered merge, the
//!   built-in default layer, and expansion of path variables such as
//!   `$TEMP` or `%APPDATA%`.
//!
//! - **`codec`** – Compression and base64 encoding of log files in the same
//!   byte layout that iTALC's own tooling produces.
//!
//! - **`store`** – Reading and writing JSON settings files and any other
//!   serializable document, with atomic replacement on write.
//!
//! - **`report`** – The bug report document: OS information, a copy of the
//!   configuration, and the encoded log files.

pub mod codec;
pub mod domain;
pub mod report;
pub mod store;

pub use codec::{decode_log, encode_log, CodecError};
pub use domain::configuration::{split_key, Configuration, ConfigurationError};
pub use domain::schema::{default_configuration, APPLICATION_NAME, VERSION};
pub use report::{BugReport, GeneralInfo};
pub use store::json_store::{with_json_extension, ExtensionCheck, JsonStore, StoreError};
