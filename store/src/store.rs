//! The state container implementation

use crate::reducer::Reducer;
use parking_lot::RwLock;
use statevault_core::{Action, Listener, StateContainer, StateTree};
use std::sync::Arc;
use tracing::debug;

/// A minimal redux-style store.
///
/// Dispatch runs the reducer under the write lock, then notifies listeners
/// synchronously in registration order. Listeners read back through
/// [`Store::get_state`]; the returned snapshot shares slices with the live
/// tree, so taking one is cheap.
pub struct Store {
    state: RwLock<StateTree>,
    reducer: Reducer,
    listeners: RwLock<Vec<Listener>>,
}

impl Store {
    /// Create a store with an empty initial state.
    pub fn new(reducer: Reducer) -> Self {
        Self::with_state(reducer, StateTree::new())
    }

    /// Create a store with a preloaded state tree.
    pub fn with_state(reducer: Reducer, initial: StateTree) -> Self {
        Self {
            state: RwLock::new(initial),
            reducer,
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl StateContainer for Store {
    fn get_state(&self) -> StateTree {
        self.state.read().clone()
    }

    fn dispatch(&self, action: Action) {
        {
            let mut state = self.state.write();
            let next = (self.reducer)(&state, &action);
            *state = next;
        }
        debug!("dispatched action, notifying listeners");

        // Snapshot the listener list so a listener may subscribe more
        // listeners without deadlocking.
        let listeners: Vec<Listener> = self.listeners.read().clone();
        for listener in listeners {
            listener();
        }
    }

    fn subscribe(&self, listener: Listener) {
        self.listeners.write().push(listener);
    }
}

/// Thread-safe store wrapper
pub type SharedStore = Arc<Store>;

/// Create a shared store with the given reducer
pub fn create_store(reducer: Reducer) -> SharedStore {
    Arc::new(Store::new(reducer))
}
