//! Configuration types for statevault

use serde::{Deserialize, Serialize};

/// Default prefix applied to every storage key.
pub const DEFAULT_KEY_PREFIX: &str = "statevault:";

/// Persistor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Serialize slices to JSON strings before writing. When false, the
    /// storage backend receives structured values directly.
    pub serialize: bool,

    /// Keys allowed to persist; None means everything not blacklisted.
    pub whitelist: Option<Vec<String>>,

    /// Keys never persisted.
    pub blacklist: Vec<String>,

    /// Minimum time between successive drain ticks of the write queue, in
    /// milliseconds. Zero means the platform minimum tick.
    pub debounce_ms: u64,

    /// Prefix applied to every storage key.
    pub key_prefix: String,

    /// Production mode: unserializable state is a hard error instead of
    /// being replaced with null.
    pub production: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            serialize: true,
            whitelist: None,
            blacklist: Vec::new(),
            debounce_ms: 0,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            production: !cfg!(debug_assertions),
        }
    }
}

impl PersistConfig {
    /// Build the storage key for a slice key.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Strip the configured prefix from a storage key.
    pub fn slice_key<'a>(&self, storage_key: &'a str) -> Option<&'a str> {
        storage_key.strip_prefix(&self.key_prefix)
    }
}
