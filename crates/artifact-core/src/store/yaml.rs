//! YAML configuration reading.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ArtifactIo;
use crate::document::ConfigDocument;
use crate::error::ArtifactError;
use crate::events::{ArtifactEvent, ArtifactSink};

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Reads a YAML file into a [`ConfigDocument`].
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::Io`] if the file cannot be read.
    /// - [`ArtifactError::ConfigEmpty`] if the file is empty, holds only
    ///   whitespace and comments, or parses to `null`.
    /// - [`ArtifactError::ConfigFormat`] if the file is not UTF-8, the YAML is
    ///   malformed, it uses keys that are not strings, or it holds a float
    ///   that JSON cannot represent (`.inf`, `-.inf`, `.nan`).
    /// - [`ArtifactError::NotAMapping`] if the root is a scalar or sequence.
    pub fn read_config(&self, path: impl AsRef<Path>) -> Result<ConfigDocument, ArtifactError> {
        let path = path.as_ref();
        let value = parse_yaml(path)?;

        if !value.is_mapping() {
            return Err(ArtifactError::NotAMapping {
                path: path.to_path_buf(),
                found: yaml_kind(&value),
            });
        }
        if let Some(key) = non_finite_float(&value) {
            return Err(format_error(
                path,
                format!("`{key}` holds a non-finite float, which a config document cannot hold"),
            ));
        }
        let entries: Map<String, Value> =
            serde_yaml::from_value(value).map_err(|source| ArtifactError::ConfigFormat {
                path: path.to_path_buf(),
                source,
            })?;

        self.emit(ArtifactEvent::ConfigLoaded {
            path: path.to_path_buf(),
        });
        Ok(ConfigDocument::from_map(entries))
    }

    /// Reads a YAML file straight into a typed schema.
    ///
    /// # Errors
    ///
    /// As [`ArtifactIo::read_config`], except that a document that does not fit
    /// `T` is reported as [`ArtifactError::ConfigFormat`].
    pub fn read_config_as<T: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<T, ArtifactError> {
        let path = path.as_ref();
        let value = parse_yaml(path)?;
        let typed = serde_yaml::from_value(value).map_err(|source| ArtifactError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;

        self.emit(ArtifactEvent::ConfigLoaded {
            path: path.to_path_buf(),
        });
        Ok(typed)
    }
}

/// Reads and parses `path`, rejecting documents that carry no content.
fn parse_yaml(path: &Path) -> Result<serde_yaml::Value, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
    let content = std::str::from_utf8(&bytes)
        .map_err(|e| format_error(path, format!("file is not valid UTF-8: {e}")))?;
    if is_blank(content) {
        return Err(ArtifactError::ConfigEmpty {
            path: path.to_path_buf(),
        });
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| ArtifactError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
    if value.is_null() {
        return Err(ArtifactError::ConfigEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(value)
}

/// True when every line is empty, a comment, or a bare document marker.
fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Dotted key of the first `.inf`, `-.inf` or `.nan` in `value`, if any.
///
/// `serde_json` has no representation for these and turns them into `null`.
fn non_finite_float(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Number(n) if n.as_f64().is_some_and(|f| !f.is_finite()) => {
            Some(String::new())
        }
        serde_yaml::Value::Sequence(items) => items.iter().enumerate().find_map(|(i, item)| {
            non_finite_float(item).map(|rest| join_key(&i.to_string(), &rest))
        }),
        serde_yaml::Value::Mapping(entries) => entries.iter().find_map(|(key, item)| {
            let label = key.as_str().unwrap_or("?");
            non_finite_float(item).map(|rest| join_key(label, &rest))
        }),
        serde_yaml::Value::Tagged(tagged) => non_finite_float(&tagged.value),
        _ => None,
    }
}

fn join_key(head: &str, rest: &str) -> String {
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{head}.{rest}")
    }
}

/// Builds a [`ArtifactError::ConfigFormat`] for content problems found outside the parser.
fn format_error(path: &Path, msg: impl std::fmt::Display) -> ArtifactError {
    ArtifactError::ConfigFormat {
        path: path.to_path_buf(),
        source: <serde_yaml::Error as serde::de::Error>::custom(msg),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
