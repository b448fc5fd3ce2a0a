//! JSON document writing and reading.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::ArtifactIo;
use crate::document::ConfigDocument;
use crate::error::ArtifactError;
use crate::events::{ArtifactEvent, ArtifactSink};

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Writes `data` to `path` as pretty-printed UTF-8 JSON, replacing any
    /// existing file.
    ///
    /// Nested values are indented by [`ArtifactIo::json_indent`] spaces (4 by
    /// default).  Object keys keep their insertion order.
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::JsonFormat`] if `data` cannot be represented as JSON
    ///   (for example a map with non-string keys).
    /// - [`ArtifactError::Io`] if the file cannot be written.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        data: &T,
    ) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let buf = self.to_pretty_json(data).map_err(|source| ArtifactError::JsonFormat {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, buf).map_err(|e| ArtifactError::io(path, e))?;

        self.emit(ArtifactEvent::JsonSaved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Reads a JSON object from `path` into a [`ConfigDocument`].
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::Io`] if the file cannot be read.
    /// - [`ArtifactError::JsonFormat`] if the content is not valid UTF-8 JSON.
    /// - [`ArtifactError::NotAMapping`] if the root is not an object.
    pub fn read_json(&self, path: impl AsRef<Path>) -> Result<ConfigDocument, ArtifactError> {
        let path = path.as_ref();
        let value: Value = self.parse_json(path)?;
        let doc = ConfigDocument::try_from(value).map_err(|found| ArtifactError::NotAMapping {
            path: path.to_path_buf(),
            found,
        })?;

        self.emit(ArtifactEvent::JsonLoaded {
            path: path.to_path_buf(),
        });
        Ok(doc)
    }

    /// Reads a JSON file straight into `T`.
    ///
    /// # Errors
    ///
    /// [`ArtifactError::Io`] if the file cannot be read, and
    /// [`ArtifactError::JsonFormat`] if the content is not valid JSON or does
    /// not fit `T`.
    pub fn read_json_as<T: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<T, ArtifactError> {
        let path = path.as_ref();
        let typed = self.parse_json(path)?;

        self.emit(ArtifactEvent::JsonLoaded {
            path: path.to_path_buf(),
        });
        Ok(typed)
    }

    fn parse_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::JsonFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    fn to_pretty_json<T: Serialize + ?Sized>(
        &self,
        data: &T,
    ) -> Result<Vec<u8>, serde_json::Error> {
        let indent = " ".repeat(self.json_indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut ser)?;
        Ok(buf)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
