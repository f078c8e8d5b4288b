//! Reducers and reducer combinators

use statevault_core::{Action, StateTree};

/// A reducer computes the next state tree from the current one and an action.
pub type Reducer = Box<dyn Fn(&StateTree, &Action) -> StateTree + Send + Sync>;

/// Baseline reducer: applies `Set` and `Remove`, ignores everything else.
pub fn default_reducer() -> Reducer {
    Box::new(|state, action| {
        let mut next = state.clone();
        match action {
            Action::Set { key, value } => next.set(key.clone(), value.clone()),
            Action::Remove { key } => {
                next.remove(key);
            }
            _ => {}
        }
        next
    })
}

/// Wrap a reducer so it handles [`Action::Rehydrate`] by shallow-merging the
/// payload into the current state: rehydrated keys replace their slices,
/// keys absent from the payload keep their current values (reducer
/// defaults). All other actions are delegated to `inner`.
pub fn with_auto_rehydrate(inner: Reducer) -> Reducer {
    Box::new(move |state, action| match action {
        Action::Rehydrate(incoming) => {
            let mut next = state.clone();
            for (key, value) in incoming.iter() {
                next.set(key.clone(), value.clone());
            }
            next
        }
        other => inner(state, other),
    })
}
