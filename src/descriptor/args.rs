//! Declared tag arguments (`required`, `mapper`, `validate`, ...).

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of a declared argument on a configuration field.
///
/// Unknown kinds are kept verbatim in [`ArgKind::Other`] so they still
/// show up in `@Args` annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgKind {
    /// Whether the host must supply a value.
    Required,
    /// Field-name mapping used when flattening structured values.
    Mapper,
    /// Validation constraints, passed through unevaluated.
    Validate,
    /// Any other argument kind.
    Other(String),
}

impl ArgKind {
    /// Returns the textual name used in tags and annotation paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Mapper => "mapper",
            Self::Validate => "validate",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ArgKind {
    fn from(value: &str) -> Self {
        match value {
            "required" => Self::Required,
            "mapper" => Self::Mapper,
            "validate" => Self::Validate,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Ordered mapping from argument kind to its declared values.
///
/// Declaration order is preserved; setting an existing kind replaces its
/// values in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagArgs {
    entries: Vec<(ArgKind, Vec<String>)>,
}

impl TagArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the values declared for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: &ArgKind) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first non-empty value declared for `kind`.
    #[must_use]
    pub fn first(&self, kind: &ArgKind) -> Option<&str> {
        self.get(kind)?
            .iter()
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }

    /// Sets the values for `kind`, replacing any previous declaration.
    pub fn set(&mut self, kind: ArgKind, values: Vec<String>) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            *existing = values;
        } else {
            self.entries.push((kind, values));
        }
    }

    /// Builder form of [`TagArgs::set`].
    #[must_use]
    pub fn with<I, S>(mut self, kind: impl Into<ArgKind>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(kind.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Iterates declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArgKind, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Returns the number of declared kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TagArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, values) in &self.entries {
            map.serialize_entry(kind.as_str(), values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TagArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagArgsVisitor;

        impl<'de> Visitor<'de> for TagArgsVisitor {
            type Value = TagArgs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of argument kinds to string lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TagArgs, A::Error> {
                let mut args = TagArgs::new();
                while let Some((kind, values)) = access.next_entry::<String, Vec<String>>()? {
                    args.set(ArgKind::from(kind.as_str()), values);
                }
                Ok(args)
            }
        }

        deserializer.deserialize_map(TagArgsVisitor)
    }
}
