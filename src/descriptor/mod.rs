//! Property descriptors: one record per declared configurable field.
//!
//! Descriptors are produced by the host's component-registration subsystem
//! and consumed by the [`exporter`](crate::exporter). This module provides:
//! - The descriptor record ([`Property`]) and its identity ([`PropertyId`])
//! - Provenance data ([`HolderChain`], [`TagKind`])
//! - Declared argument sets ([`TagArgs`], [`ArgKind`])
//! - Static type information ([`DeclaredType`], [`TypeKind`])

mod args;
mod types;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use args::{ArgKind, TagArgs};
pub use types::{DeclaredType, TypeKind};

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ownership chain from the enclosing component down to the declaring struct.
///
/// Renders as `component` for fields declared directly on the component, and
/// `component.Embed(Type)` for each level of struct embedding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HolderChain {
    /// Identity of the registered component.
    pub component: String,
    /// Embedded struct type names, outermost first.
    pub embeds: Vec<String>,
}

impl HolderChain {
    /// Creates a chain for a field declared directly on `component`.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            embeds: Vec::new(),
        }
    }

    /// Returns a chain one embedding level deeper.
    #[must_use]
    pub fn embed(mut self, type_name: impl Into<String>) -> Self {
        self.embeds.push(type_name.into());
        self
    }
}

impl fmt::Display for HolderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.component)?;
        for embed in &self.embeds {
            write!(f, ".Embed({embed})")?;
        }
        Ok(())
    }
}

/// Declaration form that produced a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Bare nested-configuration field whose type names its own root path.
    Configuration,
    /// Field rooted at an explicit `prefix` tag.
    Prefix,
    /// `prop` placeholder expression.
    Prop,
    /// `value` placeholder expression.
    Value,
}

impl TagKind {
    /// Returns the tag name used in provenance rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            // Bare configuration fields render as the prop their root path resolves to.
            Self::Configuration | Self::Prop => "prop",
            Self::Prefix => "prefix",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field carries configuration or a wiring-only dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// A configurable value.
    #[default]
    Configuration,
    /// A reference to another component.
    Component,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => f.write_str("configuration"),
            Self::Component => f.write_str("component"),
        }
    }
}

/// Stable per-field identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(String);

impl PropertyId {
    /// Returns the identity as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptor of one declared configurable field of a registered component.
///
/// `args` is the mutable part: the host may rewrite it during construction
/// and the exporter re-seeds it from its registration-time snapshot before
/// every export pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Ownership chain, used for provenance only.
    pub holder: HolderChain,
    /// Declared field name.
    pub field: String,
    /// Static field type.
    pub declared_type: DeclaredType,
    /// Declaration form.
    pub tag_kind: TagKind,
    /// Unresolved tag text, e.g. `${app.configB:config}`.
    pub raw_tag: String,
    /// Resolved tag value, e.g. `config`.
    pub tag_value: String,
    /// Configuration vs wiring field.
    pub property_type: PropertyType,
    /// Root path to default value; `Null` means no default.
    pub configurations: Map<String, Value>,
    /// Declared arguments.
    pub args: TagArgs,
    /// Live field value as seen by the host.
    pub value: Value,
}

impl Property {
    /// Creates a configuration descriptor with no roots and no arguments.
    #[must_use]
    pub fn new(
        holder: HolderChain,
        field: impl Into<String>,
        declared_type: DeclaredType,
        tag_kind: TagKind,
    ) -> Self {
        Self {
            holder,
            field: field.into(),
            declared_type,
            tag_kind,
            raw_tag: String::new(),
            tag_value: String::new(),
            property_type: PropertyType::Configuration,
            configurations: Map::new(),
            args: TagArgs::new(),
            value: Value::Null,
        }
    }

    /// Sets the raw and resolved tag text.
    #[must_use]
    pub fn with_tag(mut self, raw: impl Into<String>, resolved: impl Into<String>) -> Self {
        self.raw_tag = raw.into();
        self.tag_value = resolved.into();
        self
    }

    /// Adds a configuration root with its default (`Null` for none).
    #[must_use]
    pub fn with_configuration(mut self, path: impl Into<String>, default: Value) -> Self {
        self.configurations.insert(path.into(), default);
        self
    }

    /// Declares an argument.
    #[must_use]
    pub fn with_arg<I, S>(mut self, kind: impl Into<ArgKind>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = self.args.with(kind, values);
        self
    }

    /// Marks the descriptor as a wiring-only dependency.
    #[must_use]
    pub fn as_component(mut self) -> Self {
        self.property_type = PropertyType::Component;
        self
    }

    /// Returns the stable identity of this field.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        PropertyId(format!(
            "{}.Field({}).Tag({}:'{}')",
            self.holder, self.field, self.tag_kind, self.raw_tag
        ))
    }

    /// Returns `true` if this descriptor carries configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.property_type == PropertyType::Configuration
    }

    /// Renders the fully qualified field description used by source-property annotations.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!(
            "{}.Field({}).Tag({}:'{}')",
            self.holder, self.field, self.tag_kind, self.tag_value
        );
        if !self.raw_tag.is_empty() && self.raw_tag != self.tag_value {
            let _ = write!(out, ".Raw('{}')", self.raw_tag);
        }
        let _ = write!(out, ".Type({})", self.declared_type.name);
        out
    }
}
