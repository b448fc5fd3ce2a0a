//! # artifact-cli
//!
//! Command implementations behind the `artifact` binary.
//!
//! Each subcommand of the binary maps to one function in this crate.  The
//! functions take an [`ArtifactIo`] to do the actual file work and a writer to
//! print results to, so they can be tested against a `Vec<u8>` instead of the
//! real terminal.
//!
//! # Why a library plus a binary?
//!
//! `main.rs` only parses arguments and sets up logging.  Keeping the command
//! logic here means the integration between `clap`, the settings file, and
//! `artifact-core` stays thin, and every command can be exercised by unit
//! tests without spawning a process.
//!
//! # Error handling
//!
//! Commands return [`anyhow::Result`].  Library errors from `artifact-core`
//! are wrapped with `.with_context(...)` so the message printed on failure
//! names what the command was trying to do, followed by the underlying cause.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use artifact_core::envelope::HEADER_SIZE;
use artifact_core::{peek_header, ArtifactIo, ArtifactSink, ConfigDocument};
use serde_json::Value;
use tracing::debug;

/// Input path that means "read from standard input" for `decode-image`.
pub const STDIN_MARKER: &str = "-";

// ── Document commands ─────────────────────────────────────────────────────────

/// Reads a YAML configuration file and prints it, or one of its values, as
/// pretty JSON.
///
/// `key` is a dotted path such as `training.epochs`.
///
/// # Errors
///
/// Fails if the file cannot be read as a configuration mapping or if `key`
/// does not exist.
pub fn show_config<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    path: &Path,
    key: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let document = io
        .read_config(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    print_document(&document, key, out)
}

/// Reads a JSON file and prints it, or one of its values, as pretty JSON.
///
/// # Errors
///
/// Fails if the file is not a JSON object or if `key` does not exist.
pub fn show_json<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    path: &Path,
    key: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let document = io
        .read_json(path)
        .with_context(|| format!("failed to load JSON document {}", path.display()))?;
    print_document(&document, key, out)
}

/// Prints the whole document, or the value at `key`, followed by a newline.
fn print_document(
    document: &ConfigDocument,
    key: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rendered = match key {
        None => serde_json::to_string_pretty(document)?,
        Some(key) => {
            let value: &Value = document
                .get_path(key)
                .ok_or_else(|| anyhow!("key `{key}` not found"))?;
            serde_json::to_string_pretty(value)?
        }
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}

// ── File system commands ──────────────────────────────────────────────────────

/// Creates every directory in `dirs`.
///
/// # Errors
///
/// Fails on the first directory that cannot be created; earlier ones are kept.
pub fn make_directories<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    dirs: &[PathBuf],
    verbose: bool,
) -> anyhow::Result<()> {
    io.ensure_directories(dirs, verbose)
        .context("failed to create directories")
}

/// Prints the approximate size of `path`, e.g. `~ 2 KB`.
///
/// # Errors
///
/// Fails if the file metadata cannot be read.
pub fn print_size<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let size = io
        .file_size_kb(path)
        .with_context(|| format!("failed to read size of {}", path.display()))?;
    writeln!(out, "{size}")?;
    Ok(())
}

// ── Image commands ────────────────────────────────────────────────────────────

/// Base64-encodes the file at `path`.
///
/// The encoding goes to `output` when given, otherwise it is printed to `out`
/// followed by a newline.
///
/// # Errors
///
/// Fails if the input cannot be read or the output cannot be written.
pub fn encode_image<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    path: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let encoded = io
        .encode_image(path)
        .with_context(|| format!("failed to encode {}", path.display()))?;

    match output {
        Some(target) => std::fs::write(target, &encoded)
            .with_context(|| format!("failed to write {}", target.display()))?,
        None => {
            out.write_all(&encoded)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Decodes base64 text read from `input` and writes the bytes to `output`.
///
/// An `input` of `-` reads the text from `stdin` instead of a file.
///
/// # Errors
///
/// Fails if the input cannot be read, is not valid base64, or the output
/// cannot be written.
pub fn decode_image<S: ArtifactSink>(
    io: &ArtifactIo<S>,
    input: &Path,
    output: &Path,
    stdin: impl Read,
) -> anyhow::Result<()> {
    let encoded = read_encoded(input, stdin)?;
    io.decode_image(&encoded, output)
        .with_context(|| format!("failed to decode image into {}", output.display()))
}

fn read_encoded(input: &Path, mut stdin: impl Read) -> anyhow::Result<String> {
    if input.as_os_str() == STDIN_MARKER {
        let mut encoded = String::new();
        stdin
            .read_to_string(&mut encoded)
            .context("failed to read base64 text from stdin")?;
        return Ok(encoded);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

// ── Binary artifact commands ──────────────────────────────────────────────────

/// Prints the envelope header of a binary artifact without decoding its
/// payload.
///
/// # Errors
///
/// Fails if the file cannot be read or does not start with a valid header.
pub fn inspect(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let header = peek_header(&bytes)
        .with_context(|| format!("{} is not a binary artifact", path.display()))?;
    debug!(
        file_len = bytes.len(),
        header_len = HEADER_SIZE,
        "artifact header parsed"
    );

    writeln!(out, "kind:           {}", header.kind)?;
    writeln!(out, "schema version: {}", header.schema_version)?;
    writeln!(out, "format version: {}", header.format_version)?;
    writeln!(out, "payload bytes:  {}", header.payload_len)?;
    if header.total_len() != bytes.len() as u64 {
        writeln!(
            out,
            "warning: file holds {} bytes, header declares {}",
            bytes.len(),
            header.total_len()
        )?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
