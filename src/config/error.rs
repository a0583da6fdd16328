//! Error types for manifest loading, export settings and document rendering.

use std::path::PathBuf;

use thiserror::Error;

use crate::exporter::ParseModeError;

/// Error type for configuration operations.
///
/// Covers errors from file access, parsing, manifest validation and
/// output serialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read an input file.
    #[error("Failed to read file '{}': {source}", path.display())]
    FileRead {
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML document.
    #[error("Failed to parse TOML document: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse a JSON document.
    #[error("Failed to parse JSON document: {0}")]
    JsonParse(#[source] serde_json::Error),

    /// The manifest is well-formed but describes something invalid.
    #[error("Invalid manifest entry '{location}': {reason}")]
    InvalidManifest {
        /// Component (and field) the problem was found in
        location: String,
        /// What is wrong
        reason: String,
    },

    /// Unrecognized export mode name.
    #[error(transparent)]
    InvalidMode(#[from] ParseModeError),

    /// Failed to render the exported document as TOML.
    #[error("Failed to render TOML document: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to render the exported document as JSON.
    #[error("Failed to render JSON document: {0}")]
    JsonSerialize(#[source] serde_json::Error),
}

impl ConfigError {
    /// Creates an `InvalidManifest` error.
    #[must_use]
    pub fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
