//! Resolved export settings.
//!
//! Merges CLI arguments with the manifest's `[export]` section and loads
//! every referenced file, producing the input of one export run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::exporter::{ComponentMeta, Mode};

use super::cli::ExportArgs;
use super::document::{DocumentFormat, read_document};
use super::manifest::Manifest;
use super::ConfigError;

/// Fully resolved input of one export run.
#[derive(Debug)]
pub struct ExportSettings {
    /// Components in registration order
    pub components: Vec<ComponentMeta>,

    /// Export mode
    pub mode: Mode,

    /// Output format
    pub format: DocumentFormat,

    /// Existing configuration document, if any
    pub existing: Option<Value>,

    /// Output file; `None` writes to stdout
    pub output: Option<PathBuf>,
}

impl ExportSettings {
    /// Loads the manifest named by `args` and resolves the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or existing configuration cannot be
    /// loaded, or if a mode name is not recognized.
    pub fn load(args: &ExportArgs) -> Result<Self, ConfigError> {
        let manifest = Manifest::load(&args.manifest)?;
        let base = args.manifest.parent().unwrap_or_else(|| Path::new(""));
        Self::resolve(args, manifest, base)
    }

    /// Resolves settings from already-parsed inputs.
    ///
    /// CLI values win over the manifest's `[export]` section. A manifest
    /// `existing` path is relative to `base`. Without an explicit format the
    /// output file extension decides, falling back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing configuration cannot be loaded or a
    /// mode name is not recognized.
    pub fn resolve(args: &ExportArgs, manifest: Manifest, base: &Path) -> Result<Self, ConfigError> {
        let export = &manifest.export;

        let mode = match args.mode.as_deref().or(export.mode.as_deref()) {
            Some(names) => Mode::parse_list(names)?,
            None => Mode::empty(),
        };

        let format = args
            .format
            .or(export.format)
            .or_else(|| args.output.as_deref().map(DocumentFormat::from_path))
            .unwrap_or_default();

        let existing_path = args
            .existing
            .clone()
            .or_else(|| export.existing.as_ref().map(|p| base.join(p)));
        let existing = existing_path
            .as_deref()
            .map(read_document::<Value>)
            .transpose()?;

        Ok(Self {
            components: manifest.into_components()?,
            mode,
            format,
            existing,
            output: args.output.clone(),
        })
    }
}

impl fmt::Display for ExportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exporting {} component(s), mode: {:?}, format: {:?}",
            self.components.len(),
            self.mode,
            self.format
        )?;
        if self.existing.is_some() {
            write!(f, ", with existing configuration")?;
        }
        match &self.output {
            Some(path) => write!(f, ", output: {}", path.display()),
            None => write!(f, ", output: stdout"),
        }
    }
}
