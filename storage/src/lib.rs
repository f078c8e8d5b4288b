//! statevault Storage Backends
//!
//! Implementations of the [`statevault_core::StorageBackend`] contract:
//! an in-memory backend for tests and ephemeral use, and a sled-backed
//! persistent backend.

pub mod memory;
pub mod persistent;

pub use memory::*;
pub use persistent::*;
