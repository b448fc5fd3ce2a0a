//! The artifact operations.
//!
//! [`ArtifactIo`] is a small context object: it holds the [`ArtifactSink`]
//! that receives one event per successful operation, and the indent width used
//! for JSON output.  It has no other state, so a single instance can be shared
//! freely and every call is independent of the ones before it.
//!
//! The operations are split by artifact kind:
//!
//! | Module     | Operations                                              |
//! |------------|---------------------------------------------------------|
//! | `yaml`     | `read_config`, `read_config_as`                         |
//! | `fs`       | `ensure_directories`, `file_size_kb`, `file_size_kib`   |
//! | `json`     | `write_json`, `read_json`, `read_json_as`               |
//! | `binary`   | `write_binary`, `read_binary`                           |
//! | `image`    | `decode_image`, `encode_image`, `encode_image_string`   |
//!
//! File handles are opened and closed inside each call.  Nothing is rolled
//! back on failure: a write that fails midway may leave a partial file.

mod binary;
mod fs;
mod image;
mod json;
mod yaml;

use crate::events::{ArtifactEvent, ArtifactSink, TracingSink};

/// Indent width used by [`ArtifactIo::write_json`] unless overridden.
pub const DEFAULT_JSON_INDENT: usize = 4;

/// Logged read/write operations for configuration, JSON, binary and image files.
///
/// # Examples
///
/// ```rust
/// use artifact_core::ArtifactIo;
///
/// // Events go to `tracing` at INFO level.
/// let io = ArtifactIo::new();
/// # let dir = std::env::temp_dir().join("artifact-core-doc-new");
/// io.ensure_directories([&dir], false).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactIo<S: ArtifactSink = TracingSink> {
    sink: S,
    json_indent: usize,
}

impl ArtifactIo<TracingSink> {
    /// Creates an instance that reports events through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl Default for ArtifactIo<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Creates an instance that reports events to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink,
            json_indent: DEFAULT_JSON_INDENT,
        }
    }

    /// Overrides the JSON indent width (in spaces).
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.json_indent = indent;
        self
    }

    pub fn json_indent(&self) -> usize {
        self.json_indent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&self, event: ArtifactEvent) {
        self.sink.record(&event);
    }
}
