//! Export mode flags.

use thiserror::Error;

bitflags::bitflags! {
    /// Filtering, merge and annotation behavior of one export pass.
    ///
    /// Flags are independent and combine with bitwise OR. The empty mode
    /// dumps every declared default as a configuration schema.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mode: u8 {
        /// Substitute values already defined in the existing configuration.
        const APPEND = 1 << 0;
        /// Skip leaves already defined in the existing configuration.
        const ONLY_NEW = 1 << 1;
        /// Annotate roots with the declaring component identities.
        const ANNOTATION_SOURCE = 1 << 2;
        /// Annotate roots with full field descriptions; overrides `ANNOTATION_SOURCE`.
        const ANNOTATION_SOURCE_PROPERTY = 1 << 3;
        /// Annotate roots with their declared arguments.
        const ANNOTATION_ARGS = 1 << 4;
    }
}

/// A mode name could not be recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown export mode '{0}': expected append, only-new, source, source-property or args")]
pub struct ParseModeError(String);

impl Mode {
    /// Parses a comma- or `|`-separated list of mode names.
    ///
    /// Accepts kebab-case names (`only-new`, `annotation-source`), their
    /// short forms (`source`, `source-property`, `args`) and the flag names
    /// themselves (`ONLY_NEW`). An empty string or `none` is the empty mode.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unrecognized entry.
    pub fn parse_list(s: &str) -> Result<Self, ParseModeError> {
        s.split([',', '|'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Self::empty(), |mode, name| {
                Self::parse_one(name)
                    .map(|flag| mode | flag)
                    .ok_or_else(|| ParseModeError(name.to_string()))
            })
    }

    fn parse_one(name: &str) -> Option<Self> {
        if let Some(flag) = Self::from_name(name) {
            return Some(flag);
        }
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Some(Self::empty()),
            "append" => Some(Self::APPEND),
            "only-new" => Some(Self::ONLY_NEW),
            "source" | "annotation-source" => Some(Self::ANNOTATION_SOURCE),
            "source-property" | "annotation-source-property" => {
                Some(Self::ANNOTATION_SOURCE_PROPERTY)
            }
            "args" | "annotation-args" => Some(Self::ANNOTATION_ARGS),
            _ => None,
        }
    }

    /// Returns `true` if either source annotation flag is set.
    #[must_use]
    pub const fn annotates_sources(self) -> bool {
        self.intersects(Self::ANNOTATION_SOURCE.union(Self::ANNOTATION_SOURCE_PROPERTY))
    }
}
