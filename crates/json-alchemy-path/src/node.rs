//! The tree abstraction the evaluator walks.

use serde_json::Value;

use crate::types::PathComponent;

/// A node of a JSON-shaped tree that queries can navigate.
///
/// Handles are cloned freely while evaluating, so implementors should be cheap
/// to clone (a reference or a reference-counted pointer).
pub trait PathNode: Clone {
    /// Child under an object key. `None` for missing keys and non-objects.
    fn child_by_key(&self, key: &str) -> Option<Self>;

    /// Child at an array position. `None` when out of range or not an array.
    fn child_by_index(&self, index: usize) -> Option<Self>;

    /// Number of elements if this node is an array.
    fn array_len(&self) -> Option<usize>;

    /// All direct children in document order. Scalars have none.
    fn children(&self) -> Vec<(PathComponent, Self)>;
}

impl<'a> PathNode for &'a Value {
    fn child_by_key(&self, key: &str) -> Option<Self> {
        match *self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    fn child_by_index(&self, index: usize) -> Option<Self> {
        match *self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    fn array_len(&self) -> Option<usize> {
        match *self {
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    fn children(&self) -> Vec<(PathComponent, Self)> {
        match *self {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (PathComponent::Key(k.clone()), v))
                .collect(),
            Value::Array(arr) => arr
                .iter()
                .enumerate()
                .map(|(i, v)| (PathComponent::Index(i), v))
                .collect(),
            _ => Vec::new(),
        }
    }
}
