//! Versioned binary envelope for persisted artifacts.
//!
//! # Why an envelope? (for beginners)
//!
//! A raw `bincode` dump carries no description of what it contains.  If a
//! struct gains a field after a file was written, decoding the old file either
//! fails with a confusing message or, worse, succeeds and produces nonsense.
//!
//! Every binary artifact therefore starts with a small fixed header naming the
//! *kind* of value stored and the *schema version* its writer used.  Readers
//! check both before touching the payload, so an incompatible file becomes a
//! clear [`EnvelopeError::KindMismatch`] or
//! [`EnvelopeError::SchemaVersionMismatch`].
//!
//! Wire format (all integers big-endian):
//!
//! ```text
//! [magic:4 "ARTF"][format_version:1][reserved:1][kind_len:2][schema_version:4][payload_len:8][kind:kind_len][payload:payload_len]
//! ```
//!
//! The fixed part is [`HEADER_SIZE`] (20) bytes.  The payload is the `bincode`
//! encoding of the value.

pub mod codec;
pub mod header;

pub use codec::{decode_artifact, encode_artifact, peek_header, EnvelopeError};
pub use header::{Artifact, EnvelopeHeader, FORMAT_VERSION, HEADER_SIZE, MAGIC};
