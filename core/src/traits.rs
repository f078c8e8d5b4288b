//! Core traits defining statevault interfaces
//!
//! These traits define the contracts between the persistence layer and its
//! collaborators: the storage backend and the application state container.

use crate::error::VaultResult;
use crate::types::{Action, SliceValue, StateTree};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Asynchronous key-value storage contract.
///
/// Any backend satisfying this interface can hold persisted slices: the
/// bundled in-memory and sled implementations, or an application-supplied
/// wrapper (e.g. one that compresses values on the way through).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    async fn get_item(&self, key: &str) -> VaultResult<Option<Value>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: Value) -> VaultResult<()>;

    /// All keys currently present in the backend.
    async fn get_all_keys(&self) -> VaultResult<Vec<String>>;

    /// Delete the value stored under `key`.
    async fn remove_item(&self, key: &str) -> VaultResult<()>;

    /// Wipe all keys.
    async fn clear(&self) -> VaultResult<()>;
}

/// Thread-safe storage backend handle
pub type SharedStorage = Arc<dyn StorageBackend>;

/// Change-notification callback registered with a state container.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Redux-style state container contract.
///
/// Listeners must be invoked synchronously after every dispatch; the
/// persistence layer relies on that to diff against its last-seen snapshot.
pub trait StateContainer: Send + Sync {
    /// Snapshot the current state tree (cheap: slices are shared).
    fn get_state(&self) -> StateTree;

    /// Dispatch an action through the container's reducer.
    fn dispatch(&self, action: Action);

    /// Register a change listener.
    fn subscribe(&self, listener: Listener);
}

/// Capability interface over a state representation.
///
/// The persistor routes every state access through an adapter so that
/// non-default tree shapes can plug in without touching scheduler logic.
pub trait StateAdapter: Send + Sync {
    /// Produce an empty state to assemble rehydrated slices into.
    fn init(&self) -> StateTree;

    /// Visit every slice of `state`.
    fn iterate(&self, state: &StateTree, visit: &mut dyn FnMut(&str, &SliceValue));

    /// Read one slice of `state`.
    fn get(&self, state: &StateTree, key: &str) -> Option<SliceValue>;

    /// Write one slice of `state`.
    fn set(&self, state: &mut StateTree, key: &str, value: SliceValue);
}

/// Default adapter over the mapping-based [`StateTree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MapStateAdapter;

impl StateAdapter for MapStateAdapter {
    fn init(&self) -> StateTree {
        StateTree::new()
    }

    fn iterate(&self, state: &StateTree, visit: &mut dyn FnMut(&str, &SliceValue)) {
        for (key, value) in state.iter() {
            visit(key, value);
        }
    }

    fn get(&self, state: &StateTree, key: &str) -> Option<SliceValue> {
        state.get(key).cloned()
    }

    fn set(&self, state: &mut StateTree, key: &str, value: SliceValue) {
        state.set(key, value);
    }
}

/// Thread-safe adapter handle
pub type SharedAdapter = Arc<dyn StateAdapter>;
