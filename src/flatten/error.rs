//! Error types for structural flattening.

use thiserror::Error;

/// Why a value could not be flattened into leaf paths.
///
/// Callers recover from every variant by emitting the raw value at the
/// root path.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The `mapper` argument names an unknown convention.
    #[error("Unknown field-name mapper '{0}'")]
    UnknownMapper(String),

    /// The value is not a map-shaped document.
    #[error("Value at '{path}' is not a map (found {found})")]
    NotAMap {
        /// Root path being flattened
        path: String,
        /// JSON type name of the offending value
        found: &'static str,
    },
}
