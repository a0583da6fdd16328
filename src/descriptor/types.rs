//! Declared field types and their zero values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structural shape of a declared field type.
///
/// Decides whether a configuration default is flattened into nested
/// leaf paths or emitted as a single leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// Strings, numbers, booleans, lists and optional scalars.
    Scalar,
    /// A struct with named fields.
    Struct,
    /// A string-keyed map.
    Map,
    /// An optional struct (`Option<T>` / boxed struct).
    OptionalStruct,
    /// An optional map.
    OptionalMap,
}

impl TypeKind {
    /// Returns `true` if defaults of this kind are flattened.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        !matches!(self, Self::Scalar)
    }

    /// Returns `true` for map kinds, whose keys are data rather than field names.
    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::OptionalMap)
    }

    /// Returns the optional counterpart of a composite kind.
    #[must_use]
    pub const fn optional(self) -> Self {
        match self {
            Self::Struct => Self::OptionalStruct,
            Self::Map => Self::OptionalMap,
            other => other,
        }
    }
}

/// Static type information for a configuration field.
///
/// `zero` holds the serialized zero value of the type. For optional kinds it
/// is the zero of the pointee, so a missing default still has a shape to walk.
/// `fields` registers nested field types by serialized key; a `null` nested
/// field whose registered type is composite is replaced by that type's zero
/// value while flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Short type name used in provenance rendering.
    pub name: String,
    /// Structural shape.
    pub kind: TypeKind,
    /// Serialized zero value.
    #[serde(default)]
    pub zero: Value,
    /// Nested field types keyed by serialized field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, DeclaredType>,
}

impl DeclaredType {
    /// Describes `T` with the given kind, computing its zero from `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default instance cannot be serialized.
    pub fn of<T: Serialize + Default>(kind: TypeKind) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: short_type_name(std::any::type_name::<T>()),
            kind,
            zero: serde_json::to_value(T::default())?,
            fields: BTreeMap::new(),
        })
    }

    /// Describes a scalar type.
    ///
    /// # Errors
    ///
    /// Returns an error if the default instance cannot be serialized.
    pub fn scalar<T: Serialize + Default>() -> Result<Self, serde_json::Error> {
        Self::of::<T>(TypeKind::Scalar)
    }

    /// Describes a struct type.
    ///
    /// Only the top-level fields are known from `T`. Nested composite fields
    /// must be registered with [`with_field`](Self::with_field) for the field
    /// mapper to rename their keys and for a `null` optional substructure to
    /// expand to its zero value; unregistered nested objects are walked with
    /// their keys untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the default instance cannot be serialized.
    pub fn structure<T: Serialize + Default>() -> Result<Self, serde_json::Error> {
        Self::of::<T>(TypeKind::Struct)
    }

    /// Describes a map type.
    ///
    /// # Errors
    ///
    /// Returns an error if the default instance cannot be serialized.
    pub fn map<T: Serialize + Default>() -> Result<Self, serde_json::Error> {
        Self::of::<T>(TypeKind::Map)
    }

    /// Builds a type description from explicit parts.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind, zero: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            zero,
            fields: BTreeMap::new(),
        }
    }

    /// Marks the type as optional, keeping the pointee zero value.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.kind = self.kind.optional();
        self
    }

    /// Overrides the rendered type name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers the type of a nested field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, ty: Self) -> Self {
        self.fields.insert(key.into(), ty);
        self
    }

    /// Returns the registered type of a nested field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Self> {
        self.fields.get(key)
    }
}

/// Strips module paths from a `std::any::type_name` string.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut word = String::new();
    let mut chars = full.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            word.clear();
        } else if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
        } else {
            out.push_str(&word);
            word.clear();
            out.push(ch);
        }
    }
    out.push_str(&word);
    out
}
