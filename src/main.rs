//! Config Exporter
//!
//! Entry point for the config-exporter application.

use config_exporter::config::{Cli, Command, ExportSettings, write_manifest_template};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    match &cli.command {
        Command::Init { output } => handle_init(output),
        Command::Export(args) => {
            // Load manifest and resolve settings
            let settings = match ExportSettings::load(args) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    print_config_hint(&e);
                    return exit_code::CONFIG_ERROR;
                }
            };
            tracing::info!("{settings}");

            run_export(settings)
        }
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_manifest_template(output) {
        Ok(()) => {
            println!("Manifest template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs one export with the resolved settings.
fn run_export(settings: ExportSettings) -> ExitCode {
    match run::execute(settings) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Export failed: {e}");
            exit_code::runtime_error()
        }
    }
}
