//! Configuration export engine.
//!
//! This module provides:
//! - The registration hook that captures descriptors ([`RegistrationHook`])
//! - The export engine ([`ConfigExporter`]) with per-leaf streaming
//!   ([`ConfigExporter::for_each_leaf`]) and materialized output
//!   ([`ConfigExporter::get_config`])
//! - Export mode flags ([`Mode`])
//! - The existing-configuration lookup seam ([`ExistingConfig`])
//!
//! # Argument snapshots
//!
//! Declared arguments are snapshotted when a component registers. Every
//! traversal re-seeds each descriptor's arguments from its snapshot first,
//! so export passes never observe each other's mutations and can run in
//! any order. Passes must not be interleaved on one engine instance.
//!
//! # Annotations
//!
//! Annotations are anchored on each configuration root path:
//! `<root>@Args.<kind>` and `<root>@Sources`. They are written for every
//! root on every pass, including roots whose leaves `ONLY_NEW` filters out.

mod existing;
mod mode;
mod registration;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use existing::{ExistingConfig, NoExisting};
pub use mode::{Mode, ParseModeError};
pub use registration::{
    Application, ComponentMeta, Registration, RegistrationError, RegistrationHook,
};

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::descriptor::{ArgKind, Property, PropertyId, TagArgs};
use crate::flatten::flatten;
use crate::tree::{PropertyTree, join};

/// Suffix of the provenance annotation path.
pub const SOURCES_SUFFIX: &str = "@Sources";

/// Suffix of the declared-arguments annotation path.
pub const ARGS_SUFFIX: &str = "@Args";

/// One leaf produced by [`ConfigExporter::for_each_leaf`].
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    /// Configuration root the leaf was derived from.
    pub root: &'a str,
    /// Concrete dotted leaf path.
    pub path: &'a str,
    /// Zero-substituted default value.
    pub value: &'a Value,
}

/// Exports the configuration declared by registered components.
///
/// Register it with the host through [`RegistrationHook`], then call
/// [`get_config`](Self::get_config) once construction has finished.
pub struct ConfigExporter {
    properties: Vec<Property>,
    snapshots: HashMap<PropertyId, TagArgs>,
    existing: Box<dyn ExistingConfig>,
}

impl fmt::Debug for ConfigExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigExporter")
            .field("properties", &self.properties.len())
            .field("snapshots", &self.snapshots.len())
            .finish_non_exhaustive()
    }
}

impl Default for ConfigExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigExporter {
    /// Creates an engine with no descriptors and an empty existing configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            snapshots: HashMap::new(),
            existing: Box::new(NoExisting),
        }
    }

    /// Sets the existing-configuration source (builder form).
    #[must_use]
    pub fn with_existing(mut self, existing: impl ExistingConfig + 'static) -> Self {
        self.set_existing(existing);
        self
    }

    /// Sets the existing-configuration source.
    pub fn set_existing(&mut self, existing: impl ExistingConfig + 'static) {
        self.existing = Box::new(existing);
    }

    /// Returns the captured descriptors in registration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Visits every leaf of every captured descriptor.
    ///
    /// Arguments are re-seeded from their snapshots before the traversal.
    pub fn for_each_leaf<F>(&mut self, mut f: F)
    where
        F: FnMut(&Property, Leaf<'_>),
    {
        self.reseed();
        self.visit_roots(|property, root, leaves| {
            for (path, value) in leaves.iter() {
                f(property, Leaf { root, path, value });
            }
        });
    }

    /// Builds the exported configuration for `mode`.
    ///
    /// Per configuration root: writes the requested annotations, then emits
    /// each leaf, skipping leaves defined in the existing configuration under
    /// `ONLY_NEW` and substituting their value under `APPEND`. Under `APPEND`
    /// a composite root also keeps existing entries that have no declared
    /// default, such as operator-supplied map keys.
    pub fn get_config(&mut self, mode: Mode) -> PropertyTree {
        self.reseed();

        let existing = self.existing.as_ref();
        let mut tree = PropertyTree::new();
        let mut skipped = 0_usize;

        self.visit_roots(|property, root, leaves| {
            if mode.contains(Mode::ANNOTATION_ARGS) {
                annotate_args(&mut tree, root, &property.args);
            }
            if mode.annotates_sources() {
                let source = if mode.contains(Mode::ANNOTATION_SOURCE_PROPERTY) {
                    property.describe()
                } else {
                    property.holder.to_string()
                };
                append_source(&mut tree, root, source);
            }

            for (path, default) in leaves.iter() {
                let mut value = default.clone();
                if let Some(found) = existing.lookup(path) {
                    if mode.contains(Mode::ONLY_NEW) {
                        skipped += 1;
                        continue;
                    }
                    if mode.contains(Mode::APPEND) {
                        value = found;
                    }
                }
                tree.set(path, value);
            }

            if mode.contains(Mode::APPEND) && !mode.contains(Mode::ONLY_NEW) {
                append_operator_entries(&mut tree, existing, property, root, leaves);
            }
        });

        tracing::debug!(?mode, paths = tree.len(), skipped, "Exported configuration");
        tree
    }

    fn reseed(&mut self) {
        for property in &mut self.properties {
            if let Some(args) = self.snapshots.get(&property.id()) {
                property.args.clone_from(args);
            } else {
                tracing::warn!(
                    property = %property.id(),
                    "No argument snapshot; treating as no declared arguments"
                );
                property.args = TagArgs::new();
            }
        }
    }

    fn visit_roots<F>(&self, mut f: F)
    where
        F: FnMut(&Property, &str, &PropertyTree),
    {
        for property in &self.properties {
            for (root, default) in &property.configurations {
                let leaves = leaves_of(property, root, default);
                f(property, root, &leaves);
            }
        }
    }
}

/// Derives the leaf paths of one configuration root.
///
/// Composite types are flattened; a flatten failure falls back to the raw
/// value at the root path.
fn leaves_of(property: &Property, root: &str, default: &Value) -> PropertyTree {
    let ty = &property.declared_type;
    let value = if default.is_null() { &ty.zero } else { default };
    if !ty.kind.is_composite() {
        return [(root, value.clone())].into_iter().collect();
    }

    let mapper = property.args.first(&ArgKind::Mapper).unwrap_or_default();
    match flatten(root, mapper, value, ty) {
        Ok(leaves) => leaves,
        Err(err) => {
            tracing::warn!(
                root,
                property = %property.id(),
                error = %err,
                "Cannot flatten configuration; emitting raw value"
            );
            [(root, value.clone())].into_iter().collect()
        }
    }
}

/// Copies existing entries below a composite root that no declared leaf covers.
fn append_operator_entries(
    tree: &mut PropertyTree,
    existing: &dyn ExistingConfig,
    property: &Property,
    root: &str,
    leaves: &PropertyTree,
) {
    if !property.declared_type.kind.is_composite() {
        return;
    }
    let Some(subtree @ Value::Object(_)) = existing.lookup(root) else {
        return;
    };
    for (path, value) in PropertyTree::from_nested(&subtree).iter() {
        let path = join(root, path);
        if !leaves.contains(&path) {
            tree.set(path, value.clone());
        }
    }
}

fn annotate_args(tree: &mut PropertyTree, root: &str, args: &TagArgs) {
    for (kind, values) in args.iter() {
        let flag_only = matches!(values, [] | [_]) && values.iter().all(String::is_empty);
        let rendered = if flag_only {
            Value::Bool(true)
        } else {
            Value::from(values.to_vec())
        };
        tree.set(format!("{root}{ARGS_SUFFIX}.{kind}"), rendered);
    }
}

/// Appends to the root's source list, keeping earlier sources.
fn append_source(tree: &mut PropertyTree, root: &str, source: String) {
    let path = format!("{root}{SOURCES_SUFFIX}");
    let mut sources = match tree.get(&path) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    sources.push(Value::String(source));
    tree.set(path, Value::Array(sources));
}
