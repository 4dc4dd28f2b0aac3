//! The configuration object: an ordered tree of groups and typed values.
//!
//! A [`Configuration`] is a JSON object whose entries are either values
//! (`bool`, numbers, strings, arrays) or nested groups (objects).  Values are
//! addressed by a key plus a `/`-separated parent path:
//!
//! ```text
//! {
//!   "Logging": { "LogLevel": 4, "LogFileDirectory": "$TEMP" },
//!   "Network": { "CoreServerPort": 11100 }
//! }
//!
//! value("LogLevel", "Logging")        -> 4
//! value("CoreServerPort", "Network")  -> 11100
//! ```
//!
//! Insertion order is preserved (`serde_json`'s `preserve_order` feature) so
//! settings files and bug reports list groups in the order they were defined.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Separator between group names in a parent key, e.g. `"VNC/Advanced"`.
pub const GROUP_SEPARATOR: char = '/';

/// Error type for building or addressing a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The top-level JSON value was not an object.
    #[error("configuration data must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A `Group/Key` path had an empty key segment.
    #[error("invalid configuration key {0:?}")]
    InvalidKey(String),
}

/// An ordered mapping from setting keys to typed values, grouped by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    data: Map<String, Value>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object.
    pub fn from_data(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Converts an arbitrary JSON value into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NotAnObject`] unless `value` is an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(ConfigurationError::NotAnObject(kind_of(&other))),
        }
    }

    /// Returns the raw top-level map.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Looks up `key` inside the group addressed by `parent_key`.
    ///
    /// An empty `parent_key` addresses the top level.
    pub fn value(&self, key: &str, parent_key: &str) -> Option<&Value> {
        self.group(parent_key)?.get(key)
    }

    pub fn has_value(&self, key: &str, parent_key: &str) -> bool {
        self.value(key, parent_key).is_some()
    }

    /// Stores `value` under `key` inside the group addressed by `parent_key`.
    ///
    /// Missing groups along the path are created.  A plain value sitting where
    /// a group is expected is replaced by an empty group.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>, parent_key: &str) {
        let mut current = &mut self.data;
        for segment in segments(parent_key) {
            let entry = current
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Some(group) = entry.as_object_mut() else {
                return;
            };
            current = group;
        }
        current.insert(key.to_string(), value.into());
    }

    /// Removes `key` from the group addressed by `parent_key`, returning the
    /// previous value.
    pub fn remove_value(&mut self, key: &str, parent_key: &str) -> Option<Value> {
        let mut current = &mut self.data;
        for segment in segments(parent_key) {
            current = current.get_mut(segment)?.as_object_mut()?;
        }
        current.remove(key)
    }

    /// Drops every group and value.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Deep-merges `other` into `self`; values from `other` win on collision.
    pub fn merge(&mut self, other: &Configuration) {
        merge_maps(&mut self.data, &other.data);
    }

    /// Number of leaf values across all groups.  Empty groups count as zero.
    pub fn key_count(&self) -> usize {
        count_leaves(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lists every leaf value as a `("Group/Key", value)` pair in document order.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut entries = Vec::new();
        collect_leaves(&self.data, "", &mut entries);
        entries
    }

    fn group(&self, parent_key: &str) -> Option<&Map<String, Value>> {
        let mut current = &self.data;
        for segment in segments(parent_key) {
            current = current.get(segment)?.as_object()?;
        }
        Some(current)
    }
}

impl AddAssign<&Configuration> for Configuration {
    fn add_assign(&mut self, other: &Configuration) {
        self.merge(other);
    }
}

/// Splits a `"Group/Sub/Key"` path into `("Key", "Group/Sub")`.
///
/// A path without a separator addresses the top level: `("Key", "")`.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidKey`] when the key segment is empty.
pub fn split_key(path: &str) -> Result<(&str, &str), ConfigurationError> {
    let (parent, key) = path.rsplit_once(GROUP_SEPARATOR).unwrap_or(("", path));
    if key.is_empty() {
        return Err(ConfigurationError::InvalidKey(path.to_string()));
    }
    Ok((key, parent))
}

fn segments(parent_key: &str) -> impl Iterator<Item = &str> {
    parent_key
        .split(GROUP_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, incoming) in source {
        if let (Some(Value::Object(existing)), Value::Object(group)) = (target.get_mut(key), incoming)
        {
            merge_maps(existing, group);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

fn count_leaves(map: &Map<String, Value>) -> usize {
    map.values()
        .map(|value| match value {
            Value::Object(group) => count_leaves(group),
            _ => 1,
        })
        .sum()
}

fn collect_leaves<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{GROUP_SEPARATOR}{key}")
        };
        match value {
            Value::Object(group) => collect_leaves(group, &path, out),
            leaf => out.push((path, leaf)),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
