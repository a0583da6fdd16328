//! Registration hook: captures descriptors while the host constructs components.

use std::any::TypeId;
use std::collections::HashSet;

use thiserror::Error;

use crate::descriptor::{ArgKind, Property, PropertyId};

use super::ConfigExporter;

/// Marker type of the host application's own top-level object.
///
/// Components registered with this marker are passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Application;

/// Registration-time view of one component.
#[derive(Debug, Clone)]
pub struct ComponentMeta {
    name: String,
    marker: TypeId,
    /// Live descriptors of the component's fields.
    pub properties: Vec<Property>,
}

impl ComponentMeta {
    /// Creates metadata for a component whose concrete type is `T`.
    #[must_use]
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: TypeId::of::<T>(),
            properties: Vec::new(),
        }
    }

    /// Creates metadata for an ordinary component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::of::<Self>(name)
    }

    /// Creates metadata for the host application object.
    #[must_use]
    pub fn application(name: impl Into<String>) -> Self {
        Self::of::<Application>(name)
    }

    /// Adds a field descriptor.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns the component identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this is the host application object.
    #[must_use]
    pub fn is_application(&self) -> bool {
        self.marker == TypeId::of::<Application>()
    }
}

/// Outcome of a registration callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The component was returned unmodified.
    Skipped,
    /// Configuration descriptors were captured.
    Captured {
        /// Number of captured descriptors
        properties: usize,
    },
}

/// Errors returned to the host from the registration hook.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A descriptor with the same identity was already captured.
    #[error("Property '{id}' of component '{component}' is already registered")]
    DuplicateProperty {
        /// Component being registered
        component: String,
        /// Identity of the duplicated field
        id: PropertyId,
    },
}

/// Callback invoked by the host once per component, before construction.
pub trait RegistrationHook {
    /// Inspects and may mutate the component's live descriptors.
    ///
    /// # Errors
    ///
    /// Errors are returned to the host unchanged.
    fn on_component_registered(
        &mut self,
        meta: &mut ComponentMeta,
    ) -> Result<Registration, RegistrationError>;
}

impl RegistrationHook for ConfigExporter {
    /// Captures every configuration descriptor of the component.
    ///
    /// For each one the declared arguments are snapshotted, `required` is
    /// forced to `false` on the live descriptor, and composite-typed fields
    /// are reset to their zero value. The engine keeps a copy of the live
    /// descriptor. Nothing is captured if any identity is a duplicate.
    fn on_component_registered(
        &mut self,
        meta: &mut ComponentMeta,
    ) -> Result<Registration, RegistrationError> {
        if meta.is_application() {
            tracing::debug!(component = meta.name(), "Skipping host application");
            return Ok(Registration::Skipped);
        }

        let mut seen = HashSet::new();
        for property in meta.properties.iter().filter(|p| p.is_configuration()) {
            let id = property.id();
            if self.snapshots.contains_key(&id) || !seen.insert(id.clone()) {
                return Err(RegistrationError::DuplicateProperty {
                    component: meta.name.clone(),
                    id,
                });
            }
        }

        let mut captured = 0;
        for property in meta
            .properties
            .iter_mut()
            .filter(|p| p.is_configuration())
        {
            self.snapshots.insert(property.id(), property.args.clone());
            property
                .args
                .set(ArgKind::Required, vec!["false".to_string()]);
            if property.declared_type.kind.is_composite() {
                property.value = property.declared_type.zero.clone();
            }
            self.properties.push(property.clone());
            captured += 1;
        }

        tracing::debug!(
            component = meta.name(),
            captured,
            "Captured configuration properties"
        );
        Ok(Registration::Captured {
            properties: captured,
        })
    }
}
