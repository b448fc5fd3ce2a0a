//! Directory creation and file size reporting.

use std::path::Path;

use super::ArtifactIo;
use crate::error::ArtifactError;
use crate::events::{ArtifactEvent, ArtifactSink};

const KIB: u64 = 1024;

impl<S: ArtifactSink> ArtifactIo<S> {
    /// Creates every directory in `paths`, in order, including missing parents.
    ///
    /// Directories that already exist are left alone.  When `verbose` is set,
    /// one [`ArtifactEvent::DirectoryCreated`] is emitted per path.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] naming the first directory that could not
    /// be created.  Directories created before it are kept.
    pub fn ensure_directories<I, P>(&self, paths: I, verbose: bool) -> Result<(), ArtifactError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            std::fs::create_dir_all(path).map_err(|e| ArtifactError::io(path, e))?;
            if verbose {
                self.emit(ArtifactEvent::DirectoryCreated {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Returns the size of the file at `path` as `"~ {n} KB"`.
    ///
    /// `n` is the size in KiB rounded to the nearest integer, ties to even.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the file's metadata cannot be read.
    pub fn file_size_kb(&self, path: impl AsRef<Path>) -> Result<String, ArtifactError> {
        Ok(format!("~ {} KB", self.file_size_kib(path)?))
    }

    /// Returns the size of the file at `path` in KiB, rounded as
    /// [`ArtifactIo::file_size_kb`] does.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the file's metadata cannot be read.
    pub fn file_size_kib(&self, path: impl AsRef<Path>) -> Result<u64, ArtifactError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| ArtifactError::io(path, e))?;
        Ok(round_kib(metadata.len()))
    }
}

/// `bytes / 1024` rounded to the nearest integer, halves going to the even neighbour.
fn round_kib(bytes: u64) -> u64 {
    let whole = bytes / KIB;
    let rem = bytes % KIB;
    let half = KIB / 2;
    if rem > half || (rem == half && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
