//! statevault State Container
//!
//! A minimal redux-style store: a reducer over a [`StateTree`], synchronous
//! change notifications, and a rehydration-aware reducer combinator.
//! Applications with their own container implement
//! [`statevault_core::StateContainer`] instead.

pub mod reducer;
pub mod store;

pub use reducer::*;
pub use store::*;
