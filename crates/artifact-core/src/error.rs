//! Error type shared by every [`crate::ArtifactIo`] operation.
//!
//! Each variant names the file or directory that was being touched so callers
//! can report failures without threading the path through themselves.  The
//! underlying parser or OS error is kept as the `source`.
//!
//! Nothing in this crate catches and recovers from these errors.  They are
//! built at the point of failure and returned to the immediate caller.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::envelope::EnvelopeError;

/// Errors returned by artifact read/write operations.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The YAML content could not be parsed, did not match the requested schema,
    /// or held a value a [`crate::ConfigDocument`] cannot represent.
    #[error("malformed YAML in {path}: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The YAML file holds no document: empty, whitespace, comments only, or `null`.
    #[error("YAML file {path} is empty")]
    ConfigEmpty { path: PathBuf },

    /// The document root is a scalar or a sequence where a mapping was expected.
    #[error("expected a mapping at the root of {path}, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    /// JSON could not be parsed, or a value could not be represented as JSON.
    #[error("invalid JSON for {path}: {source}")]
    JsonFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded into a binary artifact.
    #[error("cannot serialize binary artifact for {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: EnvelopeError,
    },

    /// A binary artifact is missing, truncated, or was written by an incompatible schema.
    #[error("cannot deserialize binary artifact {path}: {source}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: EnvelopeError,
    },

    /// A base64 image payload is malformed.
    #[error("malformed base64 payload for {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },
}

impl ArtifactError {
    /// Returns the path of the artifact the failed operation was touching.
    pub fn path(&self) -> &Path {
        match self {
            ArtifactError::ConfigFormat { path, .. }
            | ArtifactError::ConfigEmpty { path }
            | ArtifactError::NotAMapping { path, .. }
            | ArtifactError::JsonFormat { path, .. }
            | ArtifactError::Io { path, .. }
            | ArtifactError::Serialization { path, .. }
            | ArtifactError::Deserialization { path, .. }
            | ArtifactError::Decode { path, .. } => path,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
