//! # artifact-core
//!
//! Logged read/write primitives for the files an image-classification project
//! moves around between its training, evaluation and serving scripts.
//!
//! Every operation is a plain function of its arguments plus the filesystem.
//! There is no caching, no retry logic and no background work; the only state
//! an [`ArtifactIo`] carries is the sink it reports events to and the JSON
//! indent width.
//!
//! # Artifact kinds
//!
//! - **Configuration** – YAML files parsed into a [`ConfigDocument`], an
//!   ordered key/value mapping with explicit accessors (`get`, `get_path`,
//!   `section`, `get_as`).  Typed schemas can be read directly with
//!   [`ArtifactIo::read_config_as`].
//!
//! - **JSON** – any `Serialize` value written with a 4-space indent, read back
//!   as a [`ConfigDocument`] or a typed value.
//!
//! - **Binary** – values of types implementing [`Artifact`], stored inside a
//!   small versioned envelope (see [`envelope`]) so that reading a file written
//!   by an incompatible schema is a reported error rather than garbage.
//!
//! - **Images** – raw file bytes converted to and from standard base64 text
//!   for embedding in JSON or HTTP payloads.
//!
//! # Logging
//!
//! The crate never installs a global logger.  Each successful operation emits
//! an [`ArtifactEvent`] to the [`ArtifactSink`] the caller injected; the
//! default [`TracingSink`] forwards it to `tracing` at `INFO` level.

pub mod document;
pub mod envelope;
pub mod error;
pub mod events;
pub mod settings;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `artifact_core::ArtifactIo` instead of `artifact_core::store::ArtifactIo`.
pub use document::{ConfigDocument, DocumentError};
pub use envelope::{
    decode_artifact, encode_artifact, peek_header, Artifact, EnvelopeError, EnvelopeHeader,
};
pub use error::ArtifactError;
pub use events::{ArtifactEvent, ArtifactSink, NullSink, RecordingSink, TracingSink};
pub use settings::{load_settings, save_settings, ArtifactSettings, SettingsError};
pub use store::ArtifactIo;
