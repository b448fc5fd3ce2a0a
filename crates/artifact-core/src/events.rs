//! Events emitted by artifact operations and the sinks that receive them.
//!
//! # Why a sink instead of calling `tracing` directly?
//!
//! The operations in [`crate::store`] do not reach for a process-wide logger.
//! Instead the caller hands an [`ArtifactSink`] to [`crate::ArtifactIo`] and
//! every successful operation reports one [`ArtifactEvent`] to it.  That keeps
//! the logging capability explicit:
//!
//! - Production code uses [`TracingSink`], which forwards each event to
//!   `tracing` at `INFO` level with a structured `path` field.
//! - Tests and embedding tools use [`RecordingSink`] to inspect exactly which
//!   events were emitted and in what order.
//! - Batch jobs that want silence use [`NullSink`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

/// One successful artifact operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactEvent {
    /// A YAML configuration file was parsed.
    ConfigLoaded { path: PathBuf },
    /// A directory was ensured to exist (emitted only in verbose mode).
    DirectoryCreated { path: PathBuf },
    /// A JSON document was written.
    JsonSaved { path: PathBuf },
    /// A JSON document was read.
    JsonLoaded { path: PathBuf },
    /// A binary artifact of `bytes` total length was written.
    BinarySaved { path: PathBuf, bytes: usize },
    /// A binary artifact of `bytes` total length was read.
    BinaryLoaded { path: PathBuf, bytes: usize },
    /// A base64 payload was decoded into `bytes` raw bytes at `path`.
    ImageDecoded { path: PathBuf, bytes: usize },
    /// The `bytes`-long file at `path` was encoded to base64.
    ImageEncoded { path: PathBuf, bytes: usize },
}

impl ArtifactEvent {
    /// Returns the path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            ArtifactEvent::ConfigLoaded { path }
            | ArtifactEvent::DirectoryCreated { path }
            | ArtifactEvent::JsonSaved { path }
            | ArtifactEvent::JsonLoaded { path }
            | ArtifactEvent::BinarySaved { path, .. }
            | ArtifactEvent::BinaryLoaded { path, .. }
            | ArtifactEvent::ImageDecoded { path, .. }
            | ArtifactEvent::ImageEncoded { path, .. } => path,
        }
    }
}

impl fmt::Display for ArtifactEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactEvent::ConfigLoaded { path } => {
                write!(f, "yaml file: {} loaded successfully", path.display())
            }
            ArtifactEvent::DirectoryCreated { path } => {
                write!(f, "created directory at: {}", path.display())
            }
            ArtifactEvent::JsonSaved { path } => {
                write!(f, "json file saved at: {}", path.display())
            }
            ArtifactEvent::JsonLoaded { path } => {
                write!(f, "json file loaded successfully from: {}", path.display())
            }
            ArtifactEvent::BinarySaved { path, bytes } => {
                write!(f, "binary file saved at: {} ({bytes} bytes)", path.display())
            }
            ArtifactEvent::BinaryLoaded { path, bytes } => {
                write!(f, "binary file loaded from: {} ({bytes} bytes)", path.display())
            }
            ArtifactEvent::ImageDecoded { path, bytes } => {
                write!(f, "image decoded to: {} ({bytes} bytes)", path.display())
            }
            ArtifactEvent::ImageEncoded { path, bytes } => {
                write!(f, "image encoded from: {} ({bytes} bytes)", path.display())
            }
        }
    }
}

/// Receives one [`ArtifactEvent`] per successful operation.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSink {
    /// Records `event`.  Must not fail; sinks swallow their own errors.
    fn record(&self, event: &ArtifactEvent);
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Arc<S> {
    fn record(&self, event: &ArtifactEvent) {
        (**self).record(event);
    }
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn record(&self, event: &ArtifactEvent) {
        (**self).record(event);
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Forwards events to `tracing` at `INFO` level.
///
/// Whether anything is printed depends on the subscriber the binary installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ArtifactSink for TracingSink {
    fn record(&self, event: &ArtifactEvent) {
        info!(path = %event.path().display(), "{event}");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ArtifactSink for NullSink {
    fn record(&self, _event: &ArtifactEvent) {}
}

/// Stores every event in memory, in emission order.
///
/// Wrap it in an `Arc` to keep a handle after giving it to
/// [`crate::ArtifactIo::with_sink`]:
///
/// ```rust
/// use std::sync::Arc;
/// use artifact_core::{ArtifactIo, RecordingSink};
///
/// let sink = Arc::new(RecordingSink::new());
/// let io = ArtifactIo::with_sink(Arc::clone(&sink));
/// # let dir = std::env::temp_dir().join("artifact-core-doc-recording");
/// io.ensure_directories([&dir], true).unwrap();
/// assert_eq!(sink.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ArtifactEvent>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<ArtifactEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns every event recorded so far.
    pub fn take(&self) -> Vec<ArtifactEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl ArtifactSink for RecordingSink {
    fn record(&self, event: &ArtifactEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
