//! Component manifest parsing.
//!
//! A manifest describes the components a host would register, with one
//! entry per declared field. It stands in for the host's registration
//! subsystem when the exporter runs as a command-line tool.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::descriptor::{DeclaredType, HolderChain, Property, TagArgs, TagKind};
use crate::exporter::ComponentMeta;

use super::document::{DocumentFormat, read_document};
use super::ConfigError;

/// Root manifest structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Export defaults, overridable from the command line
    #[serde(default)]
    pub export: ExportSection,

    /// Components in registration order
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentSection>,
}

/// Export defaults section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    /// Comma-separated mode names
    pub mode: Option<String>,

    /// Output format
    pub format: Option<DocumentFormat>,

    /// Existing configuration file
    pub existing: Option<std::path::PathBuf>,
}

/// One registered component.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSection {
    /// Component identity
    pub name: String,

    /// Marks the host application object, which is never exported
    #[serde(default)]
    pub application: bool,

    /// Declared fields
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertySection>,
}

/// One declared field.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySection {
    /// Field name
    pub field: String,

    /// Embedded struct types between the component and the field, outermost first
    #[serde(default)]
    pub embeds: Vec<String>,

    /// Declared field type
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,

    /// Declaration form (default: `prop`)
    #[serde(default = "default_tag_kind")]
    pub tag_kind: TagKind,

    /// Unresolved tag text
    #[serde(default)]
    pub tag: String,

    /// Resolved tag text (default: same as `tag`)
    pub resolved: Option<String>,

    /// Wiring-only dependency rather than configuration
    #[serde(default)]
    pub component: bool,

    /// Configuration roots
    #[serde(default, rename = "root")]
    pub roots: Vec<RootSection>,

    /// Declared arguments
    #[serde(default)]
    pub args: TagArgs,

    /// Live field value
    pub value: Option<Value>,
}

/// One configuration root of a field.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootSection {
    /// Dotted root path
    pub path: String,

    /// Default value; omitted means no default
    pub default: Option<Value>,
}

const fn default_tag_kind() -> TagKind {
    TagKind::Prop
}

impl Manifest {
    /// Loads a manifest; `.json` files are JSON, anything else TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_document(path)
    }

    /// Parses a manifest from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        DocumentFormat::Toml.parse(content)
    }

    /// Validates the manifest and builds component metadata in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or duplicate component names, empty field
    /// names, duplicate root paths, or composite types without a table zero value.
    pub fn into_components(self) -> Result<Vec<ComponentMeta>, ConfigError> {
        let mut names = HashSet::new();
        let mut components = Vec::with_capacity(self.components.len());

        for section in self.components {
            if section.name.trim().is_empty() {
                return Err(ConfigError::invalid("<unnamed>", "component name is empty"));
            }
            if !names.insert(section.name.clone()) {
                return Err(ConfigError::invalid(
                    &section.name,
                    "component is declared more than once",
                ));
            }
            components.push(section.into_meta()?);
        }

        Ok(components)
    }
}

impl ComponentSection {
    fn into_meta(self) -> Result<ComponentMeta, ConfigError> {
        let mut meta = if self.application {
            ComponentMeta::application(&self.name)
        } else {
            ComponentMeta::new(&self.name)
        };
        for property in self.properties {
            meta.properties.push(property.into_property(&self.name)?);
        }
        Ok(meta)
    }
}

impl PropertySection {
    fn into_property(self, component: &str) -> Result<Property, ConfigError> {
        if self.field.trim().is_empty() {
            return Err(ConfigError::invalid(component, "field name is empty"));
        }
        let location = format!("{component}.{}", self.field);

        let ty = &self.declared_type;
        if ty.kind.is_composite() && !ty.zero.is_object() {
            return Err(ConfigError::invalid(
                location,
                format!("type '{}' is composite but its zero value is not a table", ty.name),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(root) = self.roots.iter().find(|r| !seen.insert(r.path.as_str())) {
            return Err(ConfigError::invalid(
                location,
                format!("root '{}' is declared more than once", root.path),
            ));
        }

        let holder = self
            .embeds
            .into_iter()
            .fold(HolderChain::new(component), HolderChain::embed);
        let resolved = self.resolved.unwrap_or_else(|| self.tag.clone());

        let mut property = Property::new(holder, self.field, self.declared_type, self.tag_kind)
            .with_tag(self.tag, resolved);
        for root in self.roots {
            property = property.with_configuration(root.path, root.default.unwrap_or(Value::Null));
        }
        property.args = self.args;
        if let Some(value) = self.value {
            property.value = value;
        }
        if self.component {
            property = property.as_component();
        }
        Ok(property)
    }
}

/// Writes the manifest template to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_manifest_template(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, manifest_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Generates a commented example manifest.
#[must_use]
pub fn manifest_template() -> String {
    r#"# Component manifest for config-exporter
#
# Components are registered in file order. Each [[component.property]] entry
# describes one declared field of the component.

[export]
# Comma-separated export modes (default: none)
# Accepted: append, only-new, source, source-property, args
# mode = "only-new,source"

# Output format: "toml" or "json" (default: toml)
# format = "toml"

# Existing configuration file, consulted by append and only-new
# existing = "config.toml"

[[component]]
name = "demo/Server"

# A struct-typed field rooted at "server".
[[component.property]]
field = "Server"
tag_kind = "configuration"
tag = "server"

[component.property.type]
name = "ServerConfig"
kind = "struct"          # scalar, struct, map, optional-struct, optional-map
zero = { host = "", port = 0, tls = { cert = "", key = "" } }

# Nested composite fields are registered so null values still expand.
[component.property.type.fields.tls]
name = "TlsConfig"
kind = "optional-struct"
zero = { cert = "", key = "" }

[[component.property.root]]
path = "server"

[component.property.args]
mapper = ["snake_case"]

# A placeholder prop with a default.
[[component.property]]
field = "Greeting"
tag = "${app.greeting:hello}"
resolved = "hello"

[component.property.type]
name = "string"
kind = "scalar"
zero = ""

[[component.property.root]]
path = "app.greeting"
default = "hello"

[component.property.args]
required = ["true"]
"#
    .to_string()
}
