//! Config Exporter: hierarchical export of declared configuration
//!
//! A library that observes component registration in a dependency-injection
//! host, captures every declared configuration field, and exports a single
//! nested document of all configurable values with their defaults. Exports
//! can be filtered or merged against an existing configuration and annotated
//! with provenance and declared arguments.

pub mod config;
pub mod descriptor;
pub mod exporter;
pub mod flatten;
pub mod tree;

pub use descriptor::{DeclaredType, HolderChain, Property, TagArgs, TagKind, TypeKind};
pub use exporter::{
    ComponentMeta, ConfigExporter, ExistingConfig, Mode, Registration, RegistrationHook,
};
pub use tree::PropertyTree;
