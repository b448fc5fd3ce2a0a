//! TOML settings for tools built on top of this crate.
//!
//! The settings file is optional.  A missing file yields
//! [`ArtifactSettings::default()`], and every field falls back to its default
//! when absent, so older files keep working as new fields are added.
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [directories]
//! verbose = true
//!
//! [json]
//! indent = 4
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is missing from the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::ArtifactSink;
use crate::store::{ArtifactIo, DEFAULT_JSON_INDENT};

/// Largest accepted `json.indent`.
pub const MAX_JSON_INDENT: usize = 16;

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value outside its accepted range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtifactSettings {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub directories: DirectorySettings,
    #[serde(default)]
    pub json: JsonSettings,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Defaults for directory creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectorySettings {
    /// Whether each ensured directory is reported.
    #[serde(default = "default_true")]
    pub verbose: bool,
}

/// JSON output formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonSettings {
    /// Spaces per indent level.
    #[serde(default = "default_json_indent")]
    pub indent: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_json_indent() -> usize {
    DEFAULT_JSON_INDENT
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            verbose: default_true(),
        }
    }
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            indent: default_json_indent(),
        }
    }
}

impl ArtifactSettings {
    /// Checks every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(SettingsError::Invalid {
                field: "logging.level",
                reason: format!(
                    "`{}` is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.json.indent == 0 || self.json.indent > MAX_JSON_INDENT {
            return Err(SettingsError::Invalid {
                field: "json.indent",
                reason: format!(
                    "must be between 1 and {MAX_JSON_INDENT}, got {}",
                    self.json.indent
                ),
            });
        }
        Ok(())
    }

    /// Builds an [`ArtifactIo`] reporting to `sink` with these settings applied.
    pub fn artifact_io<S: ArtifactSink>(&self, sink: S) -> ArtifactIo<S> {
        ArtifactIo::with_sink(sink).with_json_indent(self.json.indent)
    }
}

// ── Settings file ─────────────────────────────────────────────────────────────

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not found",
/// [`SettingsError::Parse`] if the TOML is malformed, and
/// [`SettingsError::Invalid`] if a field is out of range.
pub fn load_settings(path: &Path) -> Result<ArtifactSettings, SettingsError> {
    let settings = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ArtifactSettings::default(),
        Err(e) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    settings.validate()?;
    Ok(settings)
}

/// Persists `settings` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`SettingsError::Invalid`] for out-of-range fields,
/// [`SettingsError::Io`] for file-system failures, or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings(path: &Path, settings: &ArtifactSettings) -> Result<(), SettingsError> {
    settings.validate()?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
