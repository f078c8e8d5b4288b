//! Persistent storage backend using sled database

use async_trait::async_trait;
use serde_json::Value;
use sled::{Db, Tree};
use statevault_core::{SharedStorage, StorageBackend, VaultError, VaultResult};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const ITEMS_TREE: &str = "items";

/// Persistent storage backend backed by a sled database.
///
/// Values are stored as JSON bytes, one entry per storage key. Writes flush
/// to disk before completing.
pub struct SledStorage {
    db: Db,
    items: Tree,
}

impl SledStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> VaultResult<Self> {
        let db = sled::open(path).map_err(|e| VaultError::Storage(e.to_string()))?;
        let items = db
            .open_tree(ITEMS_TREE)
            .map_err(|e| VaultError::Storage(e.to_string()))?;

        debug!("opened sled storage with {} entries", items.len());

        Ok(Self { db, items })
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl StorageBackend for SledStorage {
    async fn get_item(&self, key: &str) -> VaultResult<Option<Value>> {
        let bytes = self
            .items
            .get(key.as_bytes())
            .map_err(|e| VaultError::StorageRead {
                key: key.to_string(),
                detail: e.to_string(),
            })?;

        match bytes {
            Some(bytes) => {
                let value =
                    serde_json::from_slice(&bytes).map_err(|e| VaultError::StorageRead {
                        key: key.to_string(),
                        detail: e.to_string(),
                    })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: Value) -> VaultResult<()> {
        let bytes = serde_json::to_vec(&value).map_err(|e| VaultError::StorageWrite {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        self.items
            .insert(key.as_bytes(), bytes)
            .map_err(|e| VaultError::StorageWrite {
                key: key.to_string(),
                detail: e.to_string(),
            })?;
        self.db
            .flush_async()
            .await
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_all_keys(&self) -> VaultResult<Vec<String>> {
        let mut keys = Vec::new();
        for result in self.items.iter() {
            let (key, _) = result.map_err(|e| VaultError::Storage(e.to_string()))?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    async fn remove_item(&self, key: &str) -> VaultResult<()> {
        self.items
            .remove(key.as_bytes())
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> VaultResult<()> {
        self.items
            .clear()
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        Ok(())
    }
}

/// Create a shared persistent storage backend
pub fn create_sled_storage<P: AsRef<Path>>(path: P) -> VaultResult<SharedStorage> {
    Ok(Arc::new(SledStorage::open(path)?))
}
