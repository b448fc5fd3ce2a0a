//! Envelope constants, the decoded header, and the [`Artifact`] trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

// ── Envelope constants ────────────────────────────────────────────────────────

/// First four bytes of every binary artifact.
pub const MAGIC: [u8; 4] = *b"ARTF";

/// Current envelope layout version byte.
pub const FORMAT_VERSION: u8 = 0x01;

/// Size of the fixed part of the header in bytes (before the kind string).
pub const HEADER_SIZE: usize = 20;

// ── Artifact trait ────────────────────────────────────────────────────────────

/// A value that can be persisted as a binary artifact.
///
/// `KIND` identifies the type on disk and `SCHEMA_VERSION` must be bumped
/// whenever the serialized shape changes (a field is added, removed,
/// reordered or retyped).  Files written under a different version are
/// rejected on read instead of being misinterpreted.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use artifact_core::Artifact;
///
/// #[derive(Serialize, Deserialize)]
/// struct TrainingHistory {
///     losses: Vec<f32>,
/// }
///
/// impl Artifact for TrainingHistory {
///     const KIND: &'static str = "training-history";
///     const SCHEMA_VERSION: u32 = 1;
/// }
/// ```
pub trait Artifact: Serialize + DeserializeOwned {
    /// Non-empty tag naming the stored type (at most `u16::MAX` bytes of UTF-8).
    const KIND: &'static str;

    /// Version of the serialized shape of this type.
    const SCHEMA_VERSION: u32;
}

// ── Decoded header ────────────────────────────────────────────────────────────

/// The self-describing part of a binary artifact, readable without knowing the
/// payload type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Envelope layout version (currently always [`FORMAT_VERSION`]).
    pub format_version: u8,
    /// Kind tag written by [`Artifact::KIND`].
    pub kind: String,
    /// Schema version written by [`Artifact::SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Declared length of the payload in bytes.
    pub payload_len: u64,
}

impl EnvelopeHeader {
    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        HEADER_SIZE + self.kind.len()
    }

    /// Total artifact length implied by the header.
    pub fn total_len(&self) -> u64 {
        self.payload_offset() as u64 + self.payload_len
    }
}
