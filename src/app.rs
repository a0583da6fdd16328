//! Process-level helpers for the exporter binary.
//!
//! Exit codes, operator hints for manifest and settings errors, and the
//! stderr log subscriber.

use config_exporter::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// Exit codes of one `config-exporter` invocation.
pub mod exit_code {
    use std::process::ExitCode;

    /// The document (or manifest template) was written.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// The manifest, existing configuration or CLI settings were unusable (exit code 1).
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Registration, rendering or writing the document failed (exit code 2).
    ///
    /// `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints a follow-up hint for settings errors an operator can fix directly.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Returns the operator hint for `error`, if there is one.
fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::FileRead { .. } => {
            Some("Run 'config-exporter init' to generate a manifest template.")
        }
        ConfigError::InvalidMode(_) => {
            Some("Modes: append, only-new, source, source-property, args (comma-separated).")
        }
        ConfigError::TomlParse(_) | ConfigError::JsonParse(_) => {
            Some("Compare the manifest against the template written by 'config-exporter init'.")
        }
        ConfigError::InvalidManifest { .. } => {
            Some("Each [[component]] needs a unique name; composite types need a table 'zero'.")
        }
        _ => None,
    }
}

/// Installs the log subscriber for one export run.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`. Logs go to stderr so
/// a document written to stdout can be piped.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
