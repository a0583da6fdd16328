//! Field-name mapping selected by the `mapper` argument.

use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

use super::FlattenError;

/// Naming convention applied to struct field keys while flattening.
///
/// [`Mapper::Serde`] keeps keys as serialized, honoring `#[serde(rename)]`
/// attributes; this is what `yaml`, `json`, `toml` and an empty selector map
/// to. Map keys are data and are never renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mapper {
    /// Keys as produced by serialization.
    #[default]
    Serde,
    /// `camelCase`
    CamelCase,
    /// `PascalCase`
    PascalCase,
    /// `snake_case`
    SnakeCase,
    /// `kebab-case`
    KebabCase,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnakeCase,
    /// `lowercase`
    Lowercase,
    /// `UPPERCASE`
    Uppercase,
}

impl Mapper {
    /// Applies the convention to a field key.
    #[must_use]
    pub fn apply(self, key: &str) -> String {
        match self {
            Self::Serde => key.to_string(),
            Self::CamelCase => key.to_lower_camel_case(),
            Self::PascalCase => key.to_upper_camel_case(),
            Self::SnakeCase => key.to_snake_case(),
            Self::KebabCase => key.to_kebab_case(),
            Self::ScreamingSnakeCase => key.to_shouty_snake_case(),
            Self::Lowercase => key.to_lowercase(),
            Self::Uppercase => key.to_uppercase(),
        }
    }
}

impl FromStr for Mapper {
    type Err = FlattenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "serde" | "yaml" | "json" | "toml" => Ok(Self::Serde),
            "camelCase" => Ok(Self::CamelCase),
            "PascalCase" => Ok(Self::PascalCase),
            "snake_case" => Ok(Self::SnakeCase),
            "kebab-case" => Ok(Self::KebabCase),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnakeCase),
            "lowercase" => Ok(Self::Lowercase),
            "UPPERCASE" => Ok(Self::Uppercase),
            other => Err(FlattenError::UnknownMapper(other.to_string())),
        }
    }
}
