//! Reading and rendering TOML / JSON documents.

use std::path::Path;

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ConfigError;

/// On-disk document syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// TOML document
    #[default]
    Toml,
    /// JSON document
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension: `.json` is JSON, anything else TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    /// Parses `content` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid document of type `T`.
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(ConfigError::from),
            Self::Json => serde_json::from_str(content).map_err(ConfigError::JsonParse),
        }
    }

    /// Renders a nested document.
    ///
    /// TOML has no null: null entries are dropped and plain values are
    /// written before sub-tables at every level.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be represented in this format.
    pub fn render(self, document: &Value) -> Result<String, ConfigError> {
        match self {
            Self::Toml => Ok(toml::to_string_pretty(&tomlify(document))?),
            Self::Json => {
                serde_json::to_string_pretty(document).map_err(ConfigError::JsonSerialize)
            }
        }
    }
}

/// Reads and parses a document, choosing the format from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    DocumentFormat::from_path(path).parse(&content)
}

fn tomlify(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let (tables, plain): (Vec<_>, Vec<_>) = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .partition(|(_, v)| is_table_like(v));
            let ordered: Map<String, Value> = plain
                .into_iter()
                .chain(tables)
                .map(|(k, v)| (k.clone(), tomlify(v)))
                .collect();
            Value::Object(ordered)
        }
        Value::Array(items) => {
            Value::Array(items.iter().filter(|v| !v.is_null()).map(tomlify).collect())
        }
        other => other.clone(),
    }
}

fn is_table_like(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}
