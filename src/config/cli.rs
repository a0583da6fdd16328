//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::document::DocumentFormat;

/// config-exporter: export the configuration declared by components
///
/// Reads a component manifest and writes a hierarchical document of every
/// configurable value, optionally merged with an existing configuration.
#[derive(Debug, Parser)]
#[command(name = "config-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for config-exporter
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export the configuration declared by a component manifest
    Export(ExportArgs),

    /// Generate an example component manifest
    Init {
        /// Output path for the manifest
        #[arg(long, short, default_value = "components.toml")]
        output: PathBuf,
    },
}

/// Arguments of the `export` subcommand.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Path to the component manifest (TOML, or JSON by extension)
    pub manifest: PathBuf,

    /// Existing configuration file consulted by `append` and `only-new`
    #[arg(long, short)]
    pub existing: Option<PathBuf>,

    /// Comma-separated export modes: append, only-new, source, source-property, args
    #[arg(long, short)]
    pub mode: Option<String>,

    /// Output format
    #[arg(long, short, value_enum)]
    pub format: Option<DocumentFormat>,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
