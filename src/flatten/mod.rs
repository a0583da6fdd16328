//! Structural flattening of nested values into dotted leaf paths.
//!
//! # Rules
//!
//! - A `null` value is replaced by the declared type's zero value, so a
//!   missing default still yields every leaf path of the type.
//! - Objects are walked recursively; scalars, lists and `null`s become leaves.
//! - A `null` nested field whose registered type is composite is replaced by
//!   that type's zero value before recursing (partial zero value).
//! - Empty objects yield no leaves.
//! - Keys are visited in sorted order at every level, so map-backed values
//!   flatten deterministically.
//! - The mapper renames keys only at levels whose type is known to be a
//!   struct: the root and nested fields registered with
//!   [`DeclaredType::with_field`]. Map levels and unregistered nested
//!   objects keep their keys.

mod error;
mod mapper;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::FlattenError;
pub use mapper::Mapper;

use serde_json::{Map, Value};

use crate::descriptor::DeclaredType;
use crate::tree::{PropertyTree, join};

/// Flattens `value` into leaf paths rooted at `prefix`.
///
/// `mapper` selects the field-name convention (see [`Mapper`]); an empty
/// selector keeps serialized keys.
///
/// # Errors
///
/// Returns an error if the mapper is unknown or the (zero-substituted) value
/// is not a map. Callers fall back to emitting the raw value at `prefix`.
pub fn flatten(
    prefix: &str,
    mapper: &str,
    value: &Value,
    ty: &DeclaredType,
) -> Result<PropertyTree, FlattenError> {
    let mapper: Mapper = mapper.parse()?;
    let value = if value.is_null() { &ty.zero } else { value };
    let Value::Object(map) = value else {
        return Err(FlattenError::NotAMap {
            path: prefix.to_string(),
            found: json_type(value),
        });
    };

    let mut tree = PropertyTree::new();
    walk(&mut tree, prefix, map, Some(ty), mapper);
    Ok(tree)
}

fn walk(
    tree: &mut PropertyTree,
    prefix: &str,
    map: &Map<String, Value>,
    ty: Option<&DeclaredType>,
    mapper: Mapper,
) {
    // Keys below an unregistered nested object may be map data.
    let rename = ty.is_some_and(|t| !t.kind.is_map());
    let mut entries: Vec<(String, &String, &Value)> = map
        .iter()
        .map(|(key, child)| {
            let mapped = if rename { mapper.apply(key) } else { key.clone() };
            (mapped, key, child)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (mapped, key, child) in entries {
        let child_ty = ty.and_then(|t| t.field(key));
        let child = match child_ty {
            Some(t) if child.is_null() && t.kind.is_composite() => &t.zero,
            _ => child,
        };
        let path = join(prefix, &mapped);
        match child {
            Value::Object(nested) => walk(tree, &path, nested, child_ty, mapper),
            leaf => tree.set(path, leaf.clone()),
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
