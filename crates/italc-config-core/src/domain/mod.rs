//! Domain layer: configuration data and the rules for combining it.
//!
//! # Layering
//!
//! The effective configuration is assembled from up to three layers applied
//! in precedence order:
//!
//! ```text
//! defaults  ──+=──►  local backend  ──+=──►  loaded settings file
//! ```
//!
//! Each `+=` is a deep merge where the right-hand side wins on collisions.
//! Every key present in any layer ends up with exactly one effective value.

pub mod configuration;
pub mod paths;
pub mod schema;
