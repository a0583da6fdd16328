//! Lookup of configuration values already supplied by an operator.

use serde_json::Value;

use crate::tree::{PropertyTree, SEPARATOR};

/// Source of configuration values already defined for a leaf path.
///
/// Consulted by [`ConfigExporter::get_config`](super::ConfigExporter::get_config)
/// for `APPEND` substitution and `ONLY_NEW` filtering. A `null` value counts
/// as not defined.
pub trait ExistingConfig {
    /// Returns the value defined at `path`, if any.
    fn lookup(&self, path: &str) -> Option<Value>;
}

/// An empty configuration source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExisting;

impl ExistingConfig for NoExisting {
    fn lookup(&self, _path: &str) -> Option<Value> {
        None
    }
}

/// Walks a nested document by dotted segments.
///
/// Literal dotted keys (`{"a.b": 1}`) are honored at every level.
impl ExistingConfig for Value {
    fn lookup(&self, path: &str) -> Option<Value> {
        lookup_nested(self, path)
            .filter(|value| !value.is_null())
            .cloned()
    }
}

/// Matches a flat path exactly, then falls back to the subtree below it.
impl ExistingConfig for PropertyTree {
    fn lookup(&self, path: &str) -> Option<Value> {
        if let Some(value) = self.get(path) {
            return (!value.is_null()).then(|| value.clone());
        }

        let prefix = format!("{path}{SEPARATOR}");
        let subtree: Self = self
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        (!subtree.is_empty()).then(|| subtree.expand())
    }
}

impl<T: ExistingConfig + ?Sized> ExistingConfig for Box<T> {
    fn lookup(&self, path: &str) -> Option<Value> {
        (**self).lookup(path)
    }
}

fn lookup_nested<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let Value::Object(map) = value else {
        return None;
    };
    if let Some(found) = map.get(path) {
        return Some(found);
    }
    path.match_indices(SEPARATOR).find_map(|(i, _)| {
        map.get(&path[..i])
            .and_then(|child| lookup_nested(child, &path[i + 1..]))
    })
}
