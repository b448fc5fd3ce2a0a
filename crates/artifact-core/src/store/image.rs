//! Base64 transport for image files.
//!
//! Prediction requests usually arrive as JSON with the image embedded as a
//! base64 string.  [`ArtifactIo::decode_image`] turns that string back into a
//! file the model can read, and [`ArtifactIo::encode_image`] does the reverse
//! for responses.  The standard alphabet with padding is used in both
//! directions; no line wrapping is produced or accepted.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::ArtifactIo;
use crate::error::ArtifactError;
use crate::events::{ArtifactEvent, ArtifactSink};

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Decodes `encoded` and writes the raw bytes to `output_path`, replacing
    /// any existing file.
    ///
    /// Leading and trailing whitespace (such as a final newline) is ignored.
    /// Line breaks inside the text are not: MIME-style wrapped base64 must be
    /// joined onto one line first, or it is rejected with
    /// [`ArtifactError::Decode`].
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::Decode`] if `encoded` is not valid base64.  Nothing
    ///   is written in that case.
    /// - [`ArtifactError::Io`] if the file cannot be written.
    pub fn decode_image(
        &self,
        encoded: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<(), ArtifactError> {
        let path = output_path.as_ref();
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|source| ArtifactError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        std::fs::write(path, &bytes).map_err(|e| ArtifactError::io(path, e))?;

        self.emit(ArtifactEvent::ImageDecoded {
            path: path.to_path_buf(),
            bytes: bytes.len(),
        });
        Ok(())
    }

    /// Reads the file at `input_path` and returns its base64 encoding as bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the file cannot be read.
    pub fn encode_image(&self, input_path: impl AsRef<Path>) -> Result<Vec<u8>, ArtifactError> {
        self.encode_image_string(input_path).map(String::into_bytes)
    }

    /// Like [`ArtifactIo::encode_image`], returning the encoding as a `String`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the file cannot be read.
    pub fn encode_image_string(
        &self,
        input_path: impl AsRef<Path>,
    ) -> Result<String, ArtifactError> {
        let path = input_path.as_ref();
        let raw = std::fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
        let encoded = STANDARD.encode(&raw);

        self.emit(ArtifactEvent::ImageEncoded {
            path: path.to_path_buf(),
            bytes: raw.len(),
        });
        Ok(encoded)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MockArtifactSink, NullSink};

    /// First bytes of a PNG file followed by arbitrary binary data.
    const PNG_LIKE: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF, 0x10, 0x80,
    ];

    #[test]
    fn test_encode_image_matches_rfc4648_vector() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hello.bin");
        std::fs::write(&path, b"hello").expect("write fixture");
        let io = ArtifactIo::with_sink(NullSink);

        // Act
        let encoded = io.encode_image(&path).expect("encode");

        // Assert
        assert_eq!(encoded, b"aGVsbG8=");
    }

    #[test]
    fn test_decode_image_writes_exact_bytes() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("input.png");
        let target = dir.path().join("decoded.png");
        std::fs::write(&source, PNG_LIKE).expect("write fixture");
        let io = ArtifactIo::with_sink(NullSink);

        // Act
        let encoded = io.encode_image_string(&source).expect("encode");
        io.decode_image(&encoded, &target).expect("decode");

        // Assert
        assert_eq!(std::fs::read(&target).expect("read back"), PNG_LIKE);
    }

    #[test]
    fn test_decode_image_ignores_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("hello.txt");
        let io = ArtifactIo::with_sink(NullSink);

        io.decode_image("aGVsbG8=\n", &target).expect("decode");

        assert_eq!(std::fs::read(&target).expect("read back"), b"hello");
    }

    #[test]
    fn test_decode_image_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("inputImage.jpg");
        std::fs::write(&target, b"previous request image, longer").expect("write fixture");
        let io = ArtifactIo::with_sink(NullSink);

        io.decode_image("aGk=", &target).expect("decode");

        assert_eq!(std::fs::read(&target).expect("read back"), b"hi");
    }

    #[test]
    fn test_decode_image_malformed_is_decode_error_and_writes_nothing() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("never.png");
        let mut sink = MockArtifactSink::new();
        sink.expect_record().never();
        let io = ArtifactIo::with_sink(sink);

        // Act
        let err = io.decode_image("not base64 at all!", &target).unwrap_err();

        // Assert
        assert!(matches!(err, ArtifactError::Decode { .. }), "got {err:?}");
        assert!(!target.exists());
    }

    #[test]
    fn test_decode_image_rejects_wrapped_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let io = ArtifactIo::with_sink(NullSink);

        let result = io.decode_image("aGVs\nbG8=", dir.path().join("wrapped.bin"));

        assert!(matches!(result, Err(ArtifactError::Decode { .. })));
    }

    #[test]
    fn test_encode_image_missing_file_is_io() {
        let dir = tempfile::tempdir().expect("tempdir");
        let io = ArtifactIo::with_sink(NullSink);

        assert!(matches!(
            io.encode_image(dir.path().join("absent.jpg")),
            Err(ArtifactError::Io { .. })
        ));
    }

    #[test]
    fn test_encode_empty_file_is_empty_string() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").expect("write fixture");
        let io = ArtifactIo::with_sink(NullSink);

        assert_eq!(io.encode_image_string(&path).expect("encode"), "");
    }

    #[test]
    fn test_encode_image_emits_raw_byte_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.png");
        std::fs::write(&path, PNG_LIKE).expect("write fixture");
        let mut sink = MockArtifactSink::new();
        sink.expect_record()
            .withf(|event| match event {
                ArtifactEvent::ImageEncoded { bytes, .. } => *bytes == PNG_LIKE.len(),
                _ => false,
            })
            .times(1)
            .return_const(());
        let io = ArtifactIo::with_sink(sink);

        io.encode_image(&path).expect("encode");
    }
}
