//! In-memory storage backend for testing and ephemeral sessions

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use statevault_core::{SharedStorage, StorageBackend, VaultResult};
use std::sync::Arc;

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: DashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn with_data(data: Vec<(String, Value)>) -> Self {
        let storage = Self::new();
        for (key, value) in data {
            storage.data.insert(key, value);
        }
        storage
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get_item(&self, key: &str) -> VaultResult<Option<Value>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    async fn set_item(&self, key: &str, value: Value) -> VaultResult<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_all_keys(&self) -> VaultResult<Vec<String>> {
        Ok(self.data.iter().map(|e| e.key().clone()).collect())
    }

    async fn remove_item(&self, key: &str) -> VaultResult<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn clear(&self) -> VaultResult<()> {
        self.data.clear();
        Ok(())
    }
}

/// Create a shared in-memory storage backend
pub fn create_memory_storage() -> SharedStorage {
    Arc::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_storage_basic() {
        let storage = MemoryStorage::new();

        storage.set_item("statevault:settings", json!("{\"theme\":\"dark\"}")).await.unwrap();
        let value = storage.get_item("statevault:settings").await.unwrap();
        assert_eq!(value, Some(json!("{\"theme\":\"dark\"}")));

        storage.remove_item("statevault:settings").await.unwrap();
        let value = storage.get_item("statevault:settings").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_memory_storage_keys_and_clear() {
        let storage = MemoryStorage::new();

        storage.set_item("statevault:a", json!(1)).await.unwrap();
        storage.set_item("statevault:b", json!(2)).await.unwrap();
        storage.set_item("other:c", json!(3)).await.unwrap();

        let mut keys = storage.get_all_keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["other:c", "statevault:a", "statevault:b"]);

        storage.clear().await.unwrap();
        assert!(storage.is_empty());
    }
}
