//! Key/value document produced by YAML and JSON readers.
//!
//! # What is a `ConfigDocument`? (for beginners)
//!
//! Pipeline code tends to reach into a configuration file by path, as in
//! `data_ingestion.root_dir`.  Rust has no dynamic attributes, so a
//! [`ConfigDocument`] offers that reach through explicit accessors:
//!
//! | What you want                | `ConfigDocument` call                              |
//! |------------------------------|----------------------------------------------------|
//! | a top-level value            | `doc.get("model")` or `doc["model"]`               |
//! | a nested value               | `doc.get_path("data.root_dir")`                    |
//! | a nested mapping             | `doc.section("data")?`                             |
//! | a value as a Rust type       | `doc.get_as::<u32>("epochs")?`                     |
//! | whole file as a known schema | `doc.deserialize_into::<TrainingConfig>()?`        |
//!
//! The document is an ordered map (keys keep the order they had in the file)
//! from `String` to [`serde_json::Value`].  YAML and JSON both land in this
//! representation so downstream code does not care which format a file used.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by [`ConfigDocument`] accessors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The key (or dotted path) is not present.
    #[error("key `{0}` not found")]
    MissingKey(String),

    /// The value at `key` is not a mapping.
    #[error("value at `{key}` is {found}, not a mapping")]
    NotAMapping { key: String, found: &'static str },

    /// The value could not be converted to the requested type.
    #[error("value at `{key}` has an unexpected shape: {source}")]
    TypeMismatch {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An immutable, insertion-ordered mapping parsed from a YAML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    entries: Map<String, Value>,
}

impl ConfigDocument {
    /// Wraps an existing JSON object.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Returns the value stored under the top-level `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Walks a dot-separated path through nested mappings and sequences.
    ///
    /// Numeric segments index into sequences, so `"layers.0.units"` reads the
    /// `units` field of the first element of `layers`.  An empty path returns
    /// `None`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns the nested mapping at `path` as its own document.
    ///
    /// # Errors
    ///
    /// [`DocumentError::MissingKey`] if nothing is stored at `path`, and
    /// [`DocumentError::NotAMapping`] if the value is a scalar or sequence.
    pub fn section(&self, path: &str) -> Result<ConfigDocument, DocumentError> {
        match self.get_path(path) {
            Some(Value::Object(map)) => Ok(ConfigDocument::from_map(map.clone())),
            Some(other) => Err(DocumentError::NotAMapping {
                key: path.to_string(),
                found: value_kind(other),
            }),
            None => Err(DocumentError::MissingKey(path.to_string())),
        }
    }

    /// Converts the value at `path` into `T`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::MissingKey`] if nothing is stored at `path`, and
    /// [`DocumentError::TypeMismatch`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, DocumentError> {
        let value = self
            .get_path(path)
            .ok_or_else(|| DocumentError::MissingKey(path.to_string()))?;
        T::deserialize(value).map_err(|source| DocumentError::TypeMismatch {
            key: path.to_string(),
            source,
        })
    }

    /// Converts the whole document into a typed schema struct.
    ///
    /// # Errors
    ///
    /// [`DocumentError::TypeMismatch`] (with an empty key) if the document does
    /// not fit `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        serde_json::from_value(Value::Object(self.entries.clone())).map_err(|source| {
            DocumentError::TypeMismatch {
                key: String::new(),
                source,
            }
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Top-level keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Top-level entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

static NULL: Value = Value::Null;

/// `doc["key"]` returns `Value::Null` for absent keys, like `serde_json::Value`.
impl Index<&str> for ConfigDocument {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&NULL)
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(entries: Map<String, Value>) -> Self {
        Self::from_map(entries)
    }
}

impl TryFrom<Value> for ConfigDocument {
    /// The kind of value found instead of an object.
    type Error = &'static str;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(value_kind(&other)),
        }
    }
}

/// Human-readable name of a JSON value's kind, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
