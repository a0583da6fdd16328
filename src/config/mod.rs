//! Configuration layer for the command-line exporter.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`ExportArgs`])
//! - Component manifest parsing ([`Manifest`])
//! - Resolved export settings ([`ExportSettings`])
//! - TOML / JSON document reading and rendering ([`DocumentFormat`])
//! - Manifest template generation ([`write_manifest_template`])
//!
//! # Priority
//!
//! Export settings are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **The manifest's `[export]` section**
//! 3. **Built-in defaults**: empty mode, TOML output (or the output file's
//!    extension), no existing configuration
//!
//! # File formats
//!
//! Manifests and existing configuration files are TOML unless their
//! extension is `.json`.

mod cli;
mod document;
mod error;
mod manifest;
mod settings;


pub use cli::{Cli, Command, ExportArgs};
pub use document::{DocumentFormat, read_document};
pub use error::ConfigError;
pub use manifest::{
    ComponentSection, ExportSection, Manifest, PropertySection, RootSection, manifest_template,
    write_manifest_template,
};
pub use settings::ExportSettings;
