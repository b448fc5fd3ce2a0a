//! Binary artifact writing and reading through the versioned envelope.

use std::path::Path;

use super::ArtifactIo;
use crate::envelope::{decode_artifact, encode_artifact, Artifact, EnvelopeError};
use crate::error::ArtifactError;
use crate::events::{ArtifactEvent, ArtifactSink};

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Encodes `value` in a binary envelope and writes it to `path`,
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::Serialization`] if the value cannot be encoded.
    /// - [`ArtifactError::Io`] if the file cannot be written.
    pub fn write_binary<T: Artifact>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = encode_artifact(value).map_err(|source| ArtifactError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, &bytes).map_err(|e| ArtifactError::io(path, e))?;

        self.emit(ArtifactEvent::BinarySaved {
            path: path.to_path_buf(),
            bytes: bytes.len(),
        });
        Ok(())
    }

    /// Reads the binary artifact at `path` back into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Deserialization`] if the file is absent or
    /// unreadable, truncated, not an artifact, or was written for a different
    /// kind or schema version of `T`.
    pub fn read_binary<T: Artifact>(&self, path: impl AsRef<Path>) -> Result<T, ArtifactError> {
        let path = path.as_ref();
        let deserialization = |source: EnvelopeError| ArtifactError::Deserialization {
            path: path.to_path_buf(),
            source,
        };

        let bytes = std::fs::read(path)
            .map_err(|e| deserialization(EnvelopeError::Unreadable(e.kind())))?;
        let value = decode_artifact(&bytes).map_err(deserialization)?;

        self.emit(ArtifactEvent::BinaryLoaded {
            path: path.to_path_buf(),
            bytes: bytes.len(),
        });
        Ok(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MockArtifactSink, NullSink};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TrainingHistory {
        model_name: String,
        epochs: u32,
        losses: Vec<f32>,
        best_epoch: Option<u32>,
    }

    impl Artifact for TrainingHistory {
        const KIND: &'static str = "training-history";
        const SCHEMA_VERSION: u32 = 1;
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[allow(dead_code)]
    struct TrainingHistoryV2 {
        model_name: String,
        epochs: u32,
        losses: Vec<f32>,
        best_epoch: Option<u32>,
        learning_rate: f64,
    }

    impl Artifact for TrainingHistoryV2 {
        const KIND: &'static str = "training-history";
        const SCHEMA_VERSION: u32 = 2;
    }

    fn history() -> TrainingHistory {
        TrainingHistory {
            model_name: "vgg16".to_string(),
            epochs: 3,
            losses: vec![0.9, 0.5, 0.3],
            best_epoch: Some(2),
        }
    }

    #[test]
    fn test_write_then_read_binary_round_trips() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.bin");
        let io = ArtifactIo::with_sink(NullSink);

        // Act
        io.write_binary(&path, &history()).expect("write");
        let loaded: TrainingHistory = io.read_binary(&path).expect("read");

        // Assert
        assert_eq!(loaded, history());
    }

    #[test]
    fn test_read_binary_missing_file_is_deserialization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let io = ArtifactIo::with_sink(NullSink);

        let err = io
            .read_binary::<TrainingHistory>(dir.path().join("absent.bin"))
            .unwrap_err();

        assert!(
            matches!(
                err,
                ArtifactError::Deserialization {
                    source: EnvelopeError::Unreadable(std::io::ErrorKind::NotFound),
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn test_read_binary_truncated_file_is_deserialization() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.bin");
        let io = ArtifactIo::with_sink(NullSink);
        io.write_binary(&path, &history()).expect("write");
        let bytes = std::fs::read(&path).expect("read raw");
        std::fs::write(&path, &bytes[..bytes.len() / 2]).expect("truncate");

        // Act
        let result = io.read_binary::<TrainingHistory>(&path);

        // Assert
        assert!(matches!(result, Err(ArtifactError::Deserialization { .. })));
    }

    #[test]
    fn test_read_binary_schema_upgrade_is_deserialization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.bin");
        let io = ArtifactIo::with_sink(NullSink);
        io.write_binary(&path, &history()).expect("write");

        let err = io.read_binary::<TrainingHistoryV2>(&path).unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Deserialization {
                source: EnvelopeError::SchemaVersionMismatch {
                    expected: 2,
                    found: 1,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_read_binary_of_json_file_is_deserialization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("not-binary.json");
        std::fs::write(&path, b"{\"pretending\": \"to be an artifact\"}").expect("write");
        let io = ArtifactIo::with_sink(NullSink);

        let err = io.read_binary::<TrainingHistory>(&path).unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Deserialization {
                source: EnvelopeError::BadMagic(_),
                ..
            }
        ));
    }

    #[test]
    fn test_binary_events_report_byte_counts() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.bin");
        let expected_len = encode_artifact(&history()).expect("encode").len();
        let mut sink = MockArtifactSink::new();
        sink.expect_record()
            .withf(move |event| {
                matches!(event, ArtifactEvent::BinarySaved { bytes, .. } if *bytes == expected_len)
            })
            .times(1)
            .return_const(());
        sink.expect_record()
            .withf(move |event| {
                matches!(event, ArtifactEvent::BinaryLoaded { bytes, .. } if *bytes == expected_len)
            })
            .times(1)
            .return_const(());
        let io = ArtifactIo::with_sink(sink);

        // Act / Assert
        io.write_binary(&path, &history()).expect("write");
        let _: TrainingHistory = io.read_binary(&path).expect("read");
    }
}
