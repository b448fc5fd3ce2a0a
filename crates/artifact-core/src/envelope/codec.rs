//! Encoding and decoding of enveloped binary artifacts.

use thiserror::Error;
use tracing::debug;

use super::header::{Artifact, EnvelopeHeader, FORMAT_VERSION, HEADER_SIZE, MAGIC};

/// Errors that can occur while encoding or decoding an envelope.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnvelopeError {
    /// The byte slice is shorter than the header requires.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The file does not start with the artifact magic bytes.
    #[error("bad magic bytes {0:02X?}: not a binary artifact")]
    BadMagic([u8; 4]),

    /// The envelope layout version is not supported by this build.
    #[error("unsupported envelope format version: {0}")]
    UnsupportedFormatVersion(u8),

    /// The kind tag is empty, too long, or not valid UTF-8.
    #[error("malformed kind tag: {0}")]
    MalformedKind(String),

    /// The file holds a different kind of value than the caller asked for.
    #[error("kind mismatch: expected `{expected}`, found `{found}`")]
    KindMismatch { expected: String, found: String },

    /// The file was written with a different schema version of the same kind.
    #[error("schema version mismatch for `{kind}`: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        kind: String,
        expected: u32,
        found: u32,
    },

    /// The header's payload length does not match the bytes that follow it.
    #[error("payload length mismatch: header says {declared}, available is {available}")]
    PayloadLengthMismatch { declared: u64, available: usize },

    /// The payload could not be encoded or decoded by `bincode`.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The artifact file could not be read at all.
    #[error("artifact unreadable: {0}")]
    Unreadable(std::io::ErrorKind),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes `value` into a complete envelope (header, kind tag, payload).
///
/// # Errors
///
/// Returns [`EnvelopeError::MalformedKind`] if `T::KIND` is empty or longer
/// than `u16::MAX` bytes, and [`EnvelopeError::MalformedPayload`] if `bincode`
/// cannot serialize the value.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use artifact_core::{decode_artifact, encode_artifact, Artifact};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Classes(Vec<String>);
///
/// impl Artifact for Classes {
///     const KIND: &'static str = "classes";
///     const SCHEMA_VERSION: u32 = 1;
/// }
///
/// let original = Classes(vec!["cat".into(), "dog".into()]);
/// let bytes = encode_artifact(&original).unwrap();
/// let decoded: Classes = decode_artifact(&bytes).unwrap();
/// assert_eq!(decoded, original);
/// ```
pub fn encode_artifact<T: Artifact>(value: &T) -> Result<Vec<u8>, EnvelopeError> {
    let kind = T::KIND.as_bytes();
    if kind.is_empty() {
        return Err(EnvelopeError::MalformedKind("kind tag is empty".to_string()));
    }
    let kind_len = u16::try_from(kind.len()).map_err(|_| {
        EnvelopeError::MalformedKind(format!("kind tag is {} bytes, limit is 65535", kind.len()))
    })?;

    let payload =
        bincode::serialize(value).map_err(|e| EnvelopeError::MalformedPayload(e.to_string()))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + kind.len() + payload.len());

    // Header: magic (4) + format_version (1) + reserved (1) + kind_len (2) +
    //         schema_version (4) + payload_len (8) = 20 bytes
    buf.extend_from_slice(&MAGIC);
    buf.push(FORMAT_VERSION);
    buf.push(0x00); // reserved
    buf.extend_from_slice(&kind_len.to_be_bytes());
    buf.extend_from_slice(&T::SCHEMA_VERSION.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_be_bytes());

    buf.extend_from_slice(kind);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Reads the header of an envelope without decoding the payload.
///
/// Only the header and the kind tag need to be present; the payload length is
/// reported as declared and not checked here.
///
/// # Errors
///
/// Returns [`EnvelopeError`] if the magic, version or kind tag is invalid, or
/// if `bytes` ends before the kind tag does.
pub fn peek_header(bytes: &[u8]) -> Result<EnvelopeHeader, EnvelopeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(EnvelopeError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if magic != MAGIC {
        return Err(EnvelopeError::BadMagic(magic));
    }

    let format_version = bytes[4];
    if format_version != FORMAT_VERSION {
        return Err(EnvelopeError::UnsupportedFormatVersion(format_version));
    }

    // bytes[5] is reserved – ignored on decode

    let kind_len = read_u16(bytes, 6) as usize;
    let schema_version = read_u32(bytes, 8);
    let payload_len = read_u64(bytes, 12);

    let kind_end = HEADER_SIZE + kind_len;
    if bytes.len() < kind_end {
        return Err(EnvelopeError::InsufficientData {
            needed: kind_end,
            available: bytes.len(),
        });
    }
    if kind_len == 0 {
        return Err(EnvelopeError::MalformedKind("kind tag is empty".to_string()));
    }
    let kind = std::str::from_utf8(&bytes[HEADER_SIZE..kind_end])
        .map_err(|e| EnvelopeError::MalformedKind(format!("invalid UTF-8: {e}")))?
        .to_string();

    Ok(EnvelopeHeader {
        format_version,
        kind,
        schema_version,
        payload_len,
    })
}

/// Decodes a complete envelope into `T`.
///
/// The kind tag and schema version must match `T`, and the payload must fill
/// the rest of `bytes` exactly.
///
/// # Errors
///
/// Returns [`EnvelopeError`] describing the first check that failed.
pub fn decode_artifact<T: Artifact>(bytes: &[u8]) -> Result<T, EnvelopeError> {
    let header = peek_header(bytes)?;

    if header.kind != T::KIND {
        return Err(EnvelopeError::KindMismatch {
            expected: T::KIND.to_string(),
            found: header.kind,
        });
    }

    if header.schema_version != T::SCHEMA_VERSION {
        debug!(
            kind = T::KIND,
            expected = T::SCHEMA_VERSION,
            found = header.schema_version,
            "rejecting artifact written under another schema version"
        );
        return Err(EnvelopeError::SchemaVersionMismatch {
            kind: header.kind,
            expected: T::SCHEMA_VERSION,
            found: header.schema_version,
        });
    }

    let payload = &bytes[header.payload_offset()..];
    if payload.len() as u64 != header.payload_len {
        return Err(EnvelopeError::PayloadLengthMismatch {
            declared: header.payload_len,
            available: payload.len(),
        });
    }

    bincode::deserialize(payload).map_err(|e| EnvelopeError::MalformedPayload(e.to_string()))
}

// ── Field readers ─────────────────────────────────────────────────────────────
//
// Callers have already checked that `buf` holds HEADER_SIZE bytes.

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    u64::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
        buf[offset + 4],
        buf[offset + 5],
        buf[offset + 6],
        buf[offset + 7],
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct LabelMap {
        labels: BTreeMap<u32, String>,
    }

    impl Artifact for LabelMap {
        const KIND: &'static str = "label-map";
        const SCHEMA_VERSION: u32 = 2;
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct LabelMapV1 {
        labels: BTreeMap<u32, String>,
    }

    impl Artifact for LabelMapV1 {
        const KIND: &'static str = "label-map";
        const SCHEMA_VERSION: u32 = 1;
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Scores(Vec<f64>);

    impl Artifact for Scores {
        const KIND: &'static str = "scores";
        const SCHEMA_VERSION: u32 = 2;
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Untagged(u8);

    impl Artifact for Untagged {
        const KIND: &'static str = "";
        const SCHEMA_VERSION: u32 = 1;
    }

    fn sample() -> LabelMap {
        let mut labels = BTreeMap::new();
        labels.insert(0, "Normal".to_string());
        labels.insert(1, "Tumor".to_string());
        LabelMap { labels }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        // Arrange
        let original = sample();

        // Act
        let bytes = encode_artifact(&original).expect("encode");
        let decoded: LabelMap = decode_artifact(&bytes).expect("decode");

        // Assert
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_header_layout() {
        // Arrange
        let bytes = encode_artifact(&sample()).expect("encode");

        // Act
        let header = peek_header(&bytes).expect("header");

        // Assert
        assert_eq!(&bytes[0..4], b"ARTF");
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(bytes[5], 0x00, "reserved byte must be zero");
        assert_eq!(header.kind, "label-map");
        assert_eq!(header.schema_version, 2);
        assert_eq!(header.total_len(), bytes.len() as u64);
    }

    #[test]
    fn test_decode_empty_input_is_insufficient_data() {
        assert_eq!(
            decode_artifact::<LabelMap>(&[]),
            Err(EnvelopeError::InsufficientData {
                needed: HEADER_SIZE,
                available: 0
            })
        );
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = encode_artifact(&sample()).expect("encode");
        bytes[0] = b'X';

        assert_eq!(
            decode_artifact::<LabelMap>(&bytes),
            Err(EnvelopeError::BadMagic(*b"XRTF"))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_format_version() {
        let mut bytes = encode_artifact(&sample()).expect("encode");
        bytes[4] = 0x7F;

        assert_eq!(
            decode_artifact::<LabelMap>(&bytes),
            Err(EnvelopeError::UnsupportedFormatVersion(0x7F))
        );
    }

    #[test]
    fn test_decode_rejects_other_schema_version() {
        // Arrange – written by an older build of the same type
        let mut v1 = BTreeMap::new();
        v1.insert(7, "Cyst".to_string());
        let bytes = encode_artifact(&LabelMapV1 { labels: v1 }).expect("encode");

        // Act
        let result = decode_artifact::<LabelMap>(&bytes);

        // Assert
        assert_eq!(
            result,
            Err(EnvelopeError::SchemaVersionMismatch {
                kind: "label-map".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_decode_rejects_other_kind() {
        let bytes = encode_artifact(&Scores(vec![0.5, 0.25])).expect("encode");

        assert_eq!(
            decode_artifact::<LabelMap>(&bytes),
            Err(EnvelopeError::KindMismatch {
                expected: "label-map".to_string(),
                found: "scores".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        // Arrange
        let bytes = encode_artifact(&sample()).expect("encode");
        let truncated = &bytes[..bytes.len() - 3];

        // Act
        let result = decode_artifact::<LabelMap>(truncated);

        // Assert
        assert!(
            matches!(result, Err(EnvelopeError::PayloadLengthMismatch { .. })),
            "got {result:?}"
        );
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_artifact(&sample()).expect("encode");
        bytes.extend_from_slice(&[0xFF, 0xFF]);

        assert!(matches!(
            decode_artifact::<LabelMap>(&bytes),
            Err(EnvelopeError::PayloadLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_kind_tag() {
        let bytes = encode_artifact(&sample()).expect("encode");
        let truncated = &bytes[..HEADER_SIZE + 2];

        assert_eq!(
            peek_header(truncated),
            Err(EnvelopeError::InsufficientData {
                needed: HEADER_SIZE + "label-map".len(),
                available: HEADER_SIZE + 2,
            })
        );
    }

    #[test]
    fn test_decode_rejects_corrupt_payload() {
        // Arrange – a payload whose declared string length runs past the end
        let mut bytes = encode_artifact(&Scores(vec![1.0])).expect("encode");
        let offset = HEADER_SIZE + "scores".len();
        bytes[offset..offset + 8].copy_from_slice(&u64::MAX.to_le_bytes());

        // Act
        let result = decode_artifact::<Scores>(&bytes);

        // Assert
        assert!(
            matches!(result, Err(EnvelopeError::MalformedPayload(_))),
            "got {result:?}"
        );
    }

    #[test]
    fn test_encode_rejects_empty_kind() {
        assert!(matches!(
            encode_artifact(&Untagged(1)),
            Err(EnvelopeError::MalformedKind(_))
        ));
    }
}
