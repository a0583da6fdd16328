//! Ordered dotted-path property store.
//!
//! [`PropertyTree`] maps dotted paths (`Merge.sub.sub`) to leaf values and
//! preserves insertion order so serialized output is deterministic.
//! [`PropertyTree::expand`] re-homes the flat paths into a nested document.

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use serde::Serialize;
use serde_json::{Map, Value};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Insertion-ordered mapping from dotted path to value.
///
/// `set` on an existing path overwrites the value in place; list values are
/// replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyTree {
    entries: Map<String, Value>,
}

impl PropertyTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a nested document into dotted paths.
    ///
    /// Objects are walked recursively; arrays and scalars become leaves.
    /// Empty objects produce no paths. A non-object root yields an empty tree.
    #[must_use]
    pub fn from_nested(document: &Value) -> Self {
        let mut tree = Self::new();
        if let Value::Object(map) = document {
            tree.insert_nested("", map);
        }
        tree
    }

    fn insert_nested(&mut self, prefix: &str, map: &Map<String, Value>) {
        for (key, value) in map {
            let path = join(prefix, key);
            match value {
                Value::Object(child) => self.insert_nested(&path, child),
                leaf => self.set(path, leaf.clone()),
            }
        }
    }

    /// Sets `path` to `value`, overwriting any previous value.
    pub fn set(&mut self, path: impl Into<String>, value: Value) {
        self.entries.insert(path.into(), value);
    }

    /// Returns the value stored at exactly `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    /// Returns `true` if a value is stored at exactly `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of stored paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the flat paths into a nested document.
    ///
    /// Keys are split on `.` and grouped under their first occurrence. If a
    /// path must descend through a segment that already holds a non-object
    /// leaf, the remainder is kept under its literal dotted key at that level.
    #[must_use]
    pub fn expand(&self) -> Value {
        let mut root = Map::new();
        for (path, value) in &self.entries {
            insert_path(&mut root, path, value.clone());
        }
        Value::Object(root)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyTree {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (path, value) in iter {
            tree.set(path, value);
        }
        tree
    }
}

/// Joins a prefix and a key with the path separator.
#[must_use]
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

fn insert_path(level: &mut Map<String, Value>, path: &str, value: Value) {
    let Some((head, rest)) = path.split_once(SEPARATOR) else {
        merge_leaf(level, path, value);
        return;
    };

    let slot = level
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(child) = slot {
        insert_path(child, rest, value);
    } else {
        tracing::warn!(
            path,
            segment = head,
            "Path descends through a leaf value; keeping remainder as a dotted key"
        );
        level.insert(path.to_string(), value);
    }
}

/// Stores a leaf, merging into an existing object instead of replacing it.
///
/// A scalar landing on an object keeps the object's paths as literal dotted
/// keys beside it.
fn merge_leaf(level: &mut Map<String, Value>, key: &str, value: Value) {
    match level.get_mut(key) {
        Some(Value::Object(existing)) => match value {
            Value::Object(incoming) => {
                for (k, v) in incoming {
                    merge_leaf(existing, &k, v);
                }
            }
            leaf => {
                let nested = Value::Object(std::mem::take(existing));
                tracing::warn!(path = key, "Leaf collides with nested paths; keeping both");
                level.insert(key.to_string(), leaf);
                for (path, v) in PropertyTree::from_nested(&nested).entries {
                    level.insert(join(key, &path), v);
                }
            }
        },
        _ => {
            level.insert(key.to_string(), value);
        }
    }
}
