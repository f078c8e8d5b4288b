//! Core types for statevault
//!
//! Defines the state tree model shared across the system.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A single top-level slice of the state tree.
///
/// Slices are reference counted so that change detection can use pointer
/// identity instead of deep comparison: a reducer that returns the same
/// `SliceValue` for an untouched key costs nothing to diff.
pub type SliceValue = Arc<Value>;

/// Build a slice value from any JSON-convertible value.
pub fn slice(value: Value) -> SliceValue {
    Arc::new(value)
}

/// The application state tree: a mapping from slice key to slice value.
///
/// Cloning a tree clones the Arcs, not the underlying values, so snapshots
/// taken by the persistence layer are cheap.
#[derive(Debug, Clone, Default)]
pub struct StateTree {
    slices: HashMap<String, SliceValue>,
}

impl StateTree {
    pub fn new() -> Self {
        Self {
            slices: HashMap::new(),
        }
    }

    /// Get the slice stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&SliceValue> {
        self.slices.get(key)
    }

    /// Insert or replace the slice under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: SliceValue) {
        self.slices.insert(key.into(), value);
    }

    /// Remove the slice under `key`.
    pub fn remove(&mut self, key: &str) -> Option<SliceValue> {
        self.slices.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    /// Iterate over all slices in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SliceValue)> {
        self.slices.iter()
    }

    /// All slice keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.slices.keys()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Whether the slice under `key` is reference-identical in both trees.
    ///
    /// Two missing slices compare equal; a slice present on only one side
    /// compares unequal.
    pub fn same_slice(&self, other: &StateTree, key: &str) -> bool {
        match (self.get(key), other.get(key)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl FromIterator<(String, SliceValue)> for StateTree {
    fn from_iter<I: IntoIterator<Item = (String, SliceValue)>>(iter: I) -> Self {
        Self {
            slices: iter.into_iter().collect(),
        }
    }
}

/// Events dispatched through a state container.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the slice under `key`.
    Set { key: String, value: SliceValue },
    /// Drop the slice under `key`.
    Remove { key: String },
    /// Merge a rehydrated state tree into the live state. Emitted exactly
    /// once per rehydration, carrying the full reconstructed mapping.
    Rehydrate(StateTree),
    /// Application-defined event, interpreted by the installed reducer.
    Custom { kind: String, payload: SliceValue },
}

impl Action {
    /// Convenience constructor for `Action::Set`.
    pub fn set(key: impl Into<String>, value: Value) -> Self {
        Action::Set {
            key: key.into(),
            value: slice(value),
        }
    }

    /// Convenience constructor for `Action::Remove`.
    pub fn remove(key: impl Into<String>) -> Self {
        Action::Remove { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_slice_pointer_identity() {
        let v = slice(json!({"a": 1}));
        let mut left = StateTree::new();
        left.set("settings", v.clone());
        let mut right = StateTree::new();
        right.set("settings", v);

        assert!(left.same_slice(&right, "settings"));

        // Equal contents under a fresh Arc are not the same slice
        right.set("settings", slice(json!({"a": 1})));
        assert!(!left.same_slice(&right, "settings"));
    }

    #[test]
    fn test_same_slice_missing_keys() {
        let mut left = StateTree::new();
        let right = StateTree::new();

        assert!(left.same_slice(&right, "absent"));

        left.set("settings", slice(json!(true)));
        assert!(!left.same_slice(&right, "settings"));
    }

    #[test]
    fn test_tree_clone_shares_slices() {
        let mut tree = StateTree::new();
        tree.set("messages", slice(json!([1, 2, 3])));

        let copy = tree.clone();
        assert!(tree.same_slice(&copy, "messages"));
    }
}
