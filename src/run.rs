//! Application execution logic.
//!
//! Registers the manifest's components with the exporter, runs one export
//! pass and writes the rendered document.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use config_exporter::config::{ConfigError, ExportSettings};
use config_exporter::exporter::{
    ComponentMeta, ConfigExporter, Mode, Registration, RegistrationError, RegistrationHook,
};
use config_exporter::tree::PropertyTree;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A component was rejected by the registration hook.
    #[error("Component registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// The exported document could not be rendered.
    #[error("{0}")]
    Render(#[source] ConfigError),

    /// Failed to write the output file.
    #[error("Failed to write output '{}': {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to stdout.
    #[error("Failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

/// Executes one export.
///
/// This function:
/// 1. Registers every component in manifest order
/// 2. Builds the configuration tree for the resolved mode
/// 3. Renders it and writes it to the output file or stdout
///
/// # Errors
///
/// Returns an error if registration, rendering or writing fails.
pub fn execute(settings: ExportSettings) -> Result<(), RunError> {
    let document = export(settings.components, settings.mode, settings.existing)?;
    let mut rendered = settings.format.render(&document).map_err(RunError::Render)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    write_output(settings.output.as_deref(), &rendered)
}

/// Registers `components` and returns the expanded export document.
fn export(
    components: Vec<ComponentMeta>,
    mode: Mode,
    existing: Option<Value>,
) -> Result<Value, RunError> {
    let mut exporter = ConfigExporter::new();
    if let Some(existing) = existing {
        exporter.set_existing(PropertyTree::from_nested(&existing));
    }

    let mut skipped = 0_usize;
    for mut meta in components {
        if exporter.on_component_registered(&mut meta)? == Registration::Skipped {
            skipped += 1;
        }
    }

    let tree = exporter.get_config(mode);
    tracing::info!(
        properties = exporter.properties().len(),
        skipped,
        paths = tree.len(),
        "Configuration exported"
    );
    Ok(tree.expand())
}

fn write_output(output: Option<&Path>, rendered: &str) -> Result<(), RunError> {
    match output {
        Some(path) => std::fs::write(path, rendered).map_err(|e| RunError::Write {
            path: path.to_path_buf(),
            source: e,
        }),
        None => std::io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .map_err(RunError::Stdout),
    }
}
