//! Storage: JSON settings files and atomic document writes.
//!
//! The configurator persists two kinds of JSON documents: settings files
//! (a plain [`Configuration`](crate::Configuration) tree) and bug reports.
//! Both go through [`json_store::JsonStore`], which writes a complete
//! document to a temp file next to the target and renames it into place, so
//! readers never observe a half-written file.

pub mod json_store;
