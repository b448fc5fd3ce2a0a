//! `artifact`: command-line front end for artifact-core.
//!
//! Lets you inspect and produce the files an ML pipeline leaves behind
//! (YAML configs, JSON score files, binary artifacts, base64 image payloads)
//! without writing any code.
//!
//! # Usage
//!
//! ```text
//! artifact [--settings <FILE>] <COMMAND>
//!
//! Commands:
//!   show-config  <FILE> [--key a.b]      Print a YAML config as JSON
//!   show-json    <FILE> [--key a.b]      Print a JSON document
//!   mkdirs       <DIR>... [--quiet]      Create directories
//!   size         <FILE>                  Print "~ N KB"
//!   encode-image <FILE> [--output <F>]   Base64-encode a file
//!   decode-image <OUT> --input <F|->     Decode base64 text into a file
//!   inspect      <FILE>                  Show a binary artifact's header
//! ```
//!
//! # Environment variables
//!
//! | Variable            | Description                                   |
//! |---------------------|-----------------------------------------------|
//! | `ARTIFACT_SETTINGS` | Path of the TOML settings file (`--settings`) |
//! | `RUST_LOG`          | Log filter; overrides `logging.level`         |

use std::path::PathBuf;

use anyhow::Context;
use artifact_cli::{
    decode_image, encode_image, inspect, make_directories, print_size, show_config, show_json,
};
use artifact_core::{load_settings, ArtifactSettings, TracingSink};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and produce ML pipeline artifacts.
///
/// The `#[derive(Parser)]` macro from `clap` generates the argument parser
/// from the struct fields and their `#[arg(...)]` attributes.
#[derive(Debug, Parser)]
#[command(
    name = "artifact",
    about = "Read, write and inspect ML pipeline artifacts",
    version
)]
struct Cli {
    /// TOML settings file.  Defaults apply when omitted or missing.
    #[arg(long, global = true, env = "ARTIFACT_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a YAML configuration file as JSON.
    ShowConfig {
        file: PathBuf,
        /// Dotted path of a single value to print, e.g. `training.epochs`.
        #[arg(long)]
        key: Option<String>,
    },

    /// Print a JSON document.
    ShowJson {
        file: PathBuf,
        /// Dotted path of a single value to print.
        #[arg(long)]
        key: Option<String>,
    },

    /// Create directories, including missing parents.
    Mkdirs {
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
        /// Do not report each directory, whatever the settings file says.
        #[arg(long)]
        quiet: bool,
    },

    /// Print the approximate size of a file in kilobytes.
    Size { file: PathBuf },

    /// Base64-encode a file.
    EncodeImage {
        file: PathBuf,
        /// Write the encoding here instead of standard output.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Decode base64 text into a file.
    DecodeImage {
        output: PathBuf,
        /// File holding the base64 text, or `-` for standard input.
        #[arg(long, short)]
        input: PathBuf,
    },

    /// Show the header of a binary artifact.
    Inspect { file: PathBuf },
}

impl Cli {
    /// Loads the settings file named by `--settings`, or defaults.
    fn load_settings(&self) -> anyhow::Result<ArtifactSettings> {
        match &self.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display())),
            None => Ok(ArtifactSettings::default()),
        }
    }
}

/// Builds the log filter: `RUST_LOG` when set and valid, else `level`.
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed with `clap` into a [`Cli`] struct.
/// 2. The settings file is loaded, so its `logging.level` can seed the log
///    filter.
/// 3. `tracing_subscriber` is initialised.  `RUST_LOG` still wins when set.
/// 4. The subcommand runs against an `ArtifactIo` that logs through `tracing`.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&settings.logging.level))
        .with_writer(std::io::stderr)
        .init();

    let io = settings.artifact_io(TracingSink);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::ShowConfig { file, key } => show_config(&io, &file, key.as_deref(), &mut stdout),
        Command::ShowJson { file, key } => show_json(&io, &file, key.as_deref(), &mut stdout),
        Command::Mkdirs { dirs, quiet } => {
            make_directories(&io, &dirs, settings.directories.verbose && !quiet)
        }
        Command::Size { file } => print_size(&io, &file, &mut stdout),
        Command::EncodeImage { file, output } => {
            encode_image(&io, &file, output.as_deref(), &mut stdout)
        }
        Command::DecodeImage { output, input } => {
            decode_image(&io, &input, &output, std::io::stdin().lock())
        }
        Command::Inspect { file } => inspect(&file, &mut stdout),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
