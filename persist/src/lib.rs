//! statevault Persistence Engine
//!
//! Observes a state container, diffs changed slices, and drains them onto an
//! asynchronous storage backend on a debounced schedule. Rehydrates persisted
//! slices back into the live state at startup.

pub mod filter;
pub mod persistor;
pub mod purge;
pub mod serializer;
pub mod transform;

mod scheduler;

pub use filter::*;
pub use persistor::*;
pub use purge::*;
pub use serializer::*;
pub use transform::*;
