//! Persistor facade and builder

use crate::purge::purge_stored_state;
use crate::scheduler::Scheduler;
use crate::transform::{Transform, TransformPipeline};
use serde_json::Value;
use statevault_core::{
    Action, MapStateAdapter, PersistConfig, SharedAdapter, SharedStorage, StateContainer,
    StateTree, VaultResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Incoming data for [`Persistor::rehydrate`].
pub enum RehydratePayload {
    /// Mapping from slice key to its stored (encoded) form; each entry is
    /// decoded and run through the transform pipeline in reverse.
    Serial(HashMap<String, Value>),
    /// Already-structured state, used as the rehydrated tree directly.
    Raw(StateTree),
}

/// Facade over the persistence subsystem for one state container.
///
/// Construction subscribes the write scheduler to the container; from then
/// on every dispatch diffs and queues changed slices. The persistor must be
/// built inside a tokio runtime, since draining and storage writes run as
/// spawned tasks.
pub struct Persistor {
    scheduler: Arc<Scheduler>,
}

impl Persistor {
    /// Rebuild a state tree from incoming data and dispatch exactly one
    /// [`Action::Rehydrate`] carrying it. Per-key decode or transform
    /// failures are logged and the key is omitted, leaving its reducer
    /// default in place. Returns the reconstructed tree.
    pub fn rehydrate(&self, incoming: RehydratePayload) -> StateTree {
        let scheduler = &self.scheduler;

        let state = match incoming {
            RehydratePayload::Serial(entries) => {
                let mut state = scheduler.adapter.init();
                for (key, stored) in entries {
                    match self.decode_entry(&key, &stored) {
                        Ok(Some(value)) => {
                            scheduler.adapter.set(&mut state, &key, Arc::new(value));
                        }
                        Ok(None) => {
                            debug!("transform omitted key \"{}\" during rehydration", key);
                        }
                        Err(e) => {
                            warn!("error rehydrating data for key \"{}\": {}", key, e);
                        }
                    }
                }
                state
            }
            RehydratePayload::Raw(state) => state,
        };

        scheduler.container.dispatch(Action::Rehydrate(state.clone()));
        state
    }

    fn decode_entry(&self, key: &str, stored: &Value) -> VaultResult<Option<Value>> {
        let decoded = self.scheduler.serializer.decode_value(key, stored)?;
        self.scheduler.pipeline.apply_read(decoded, key)
    }

    /// Stop diffing on further notifications. Already-queued and in-flight
    /// writes are unaffected; a drain tick scheduled before the pause still
    /// fires.
    pub fn pause(&self) {
        self.scheduler.pause();
    }

    /// Resume diffing; the next dispatch's changed keys enqueue normally.
    pub fn resume(&self) {
        self.scheduler.resume();
    }

    /// Delete the given slice keys from storage, or every key under the
    /// configured prefix when `keys` is `None`.
    pub async fn purge(&self, keys: Option<Vec<String>>) -> VaultResult<()> {
        purge_stored_state(&self.scheduler.storage, &self.scheduler.key_prefix, keys).await
    }

    /// Startup bootstrap: read every persisted slice under the prefix that
    /// passes the key filter, then rehydrate. Per-key read failures are
    /// logged and skipped.
    pub async fn restore(&self) -> VaultResult<StateTree> {
        let scheduler = &self.scheduler;
        let storage_keys = scheduler.storage.get_all_keys().await?;

        let mut entries = HashMap::new();
        for storage_key in storage_keys {
            let Some(key) = storage_key.strip_prefix(&scheduler.key_prefix) else {
                continue;
            };
            if !scheduler.filter.should_persist(key) {
                continue;
            }
            match scheduler.storage.get_item(&storage_key).await {
                Ok(Some(stored)) => {
                    entries.insert(key.to_string(), stored);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("error reading persisted key {}: {}", storage_key, e);
                }
            }
        }

        info!("restoring {} persisted slices", entries.len());
        Ok(self.rehydrate(RehydratePayload::Serial(entries)))
    }
}

/// Builder for [`Persistor`] instances.
pub struct PersistorBuilder {
    container: Arc<dyn StateContainer>,
    storage: SharedStorage,
    config: PersistConfig,
    transforms: Vec<Transform>,
    adapter: SharedAdapter,
}

impl PersistorBuilder {
    pub fn new(container: Arc<dyn StateContainer>, storage: SharedStorage) -> Self {
        Self {
            container,
            storage,
            config: PersistConfig::default(),
            transforms: Vec::new(),
            adapter: Arc::new(MapStateAdapter),
        }
    }

    pub fn config(mut self, config: PersistConfig) -> Self {
        self.config = config;
        self
    }

    pub fn whitelist<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.whitelist = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn blacklist<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.blacklist = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.config.debounce_ms = debounce_ms;
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.key_prefix = prefix.into();
        self
    }

    pub fn serialize(mut self, serialize: bool) -> Self {
        self.config.serialize = serialize;
        self
    }

    pub fn production(mut self, production: bool) -> Self {
        self.config.production = production;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn adapter(mut self, adapter: SharedAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// Build the persistor and subscribe its scheduler to the container.
    pub fn build(self) -> Persistor {
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&self.container),
            self.storage,
            &self.config,
            TransformPipeline::new(self.transforms),
            self.adapter,
        ));

        let notify_target = Arc::clone(&scheduler);
        self.container
            .subscribe(Arc::new(move || Scheduler::notify(&notify_target)));

        Persistor { scheduler }
    }
}
