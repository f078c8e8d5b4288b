//! Stored-state purge

use statevault_core::{SharedStorage, VaultResult};
use tracing::info;

/// Delete persisted slices from a storage backend.
///
/// With `keys`, only the named slices are removed. Without, every key under
/// `key_prefix` is discovered via `get_all_keys` and removed, leaving keys
/// outside the prefix untouched.
pub async fn purge_stored_state(
    storage: &SharedStorage,
    key_prefix: &str,
    keys: Option<Vec<String>>,
) -> VaultResult<()> {
    match keys {
        Some(keys) => {
            for key in &keys {
                let storage_key = format!("{key_prefix}{key}");
                storage.remove_item(&storage_key).await?;
            }
            info!("purged {} persisted slices", keys.len());
        }
        None => {
            let all_keys = storage.get_all_keys().await?;
            let mut purged = 0usize;
            for storage_key in all_keys {
                if storage_key.starts_with(key_prefix) {
                    storage.remove_item(&storage_key).await?;
                    purged += 1;
                }
            }
            info!("purged all {} slices under prefix {}", purged, key_prefix);
        }
    }
    Ok(())
}
