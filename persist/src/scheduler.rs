//! Debounced write scheduling
//!
//! The scheduler diffs the state tree against its last-seen snapshot on
//! every change notification, queues changed persistable keys, and drains
//! one key per tick onto the storage backend. Diffing is synchronous and
//! uses slice pointer identity only, so dispatch never blocks on I/O.

use crate::filter::KeyFilter;
use crate::serializer::Serializer;
use crate::transform::TransformPipeline;
use parking_lot::Mutex;
use statevault_core::{PersistConfig, SharedAdapter, SharedStorage, StateContainer, StateTree};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, warn};

/// Scheduler state owned by one persistor instance. Multiple independent
/// persistors in one process never share queues or snapshots.
pub(crate) struct Scheduler {
    pub(crate) container: Arc<dyn StateContainer>,
    pub(crate) storage: SharedStorage,
    pub(crate) filter: KeyFilter,
    pub(crate) pipeline: TransformPipeline,
    pub(crate) serializer: Serializer,
    pub(crate) adapter: SharedAdapter,
    pub(crate) key_prefix: String,
    debounce: Duration,
    pending: Mutex<VecDeque<String>>,
    last_state: Mutex<StateTree>,
    paused: AtomicBool,
    drain: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub(crate) fn new(
        container: Arc<dyn StateContainer>,
        storage: SharedStorage,
        config: &PersistConfig,
        pipeline: TransformPipeline,
        adapter: SharedAdapter,
    ) -> Self {
        let last_state = adapter.init();
        Self {
            container,
            storage,
            filter: KeyFilter::new(config.whitelist.clone(), config.blacklist.clone()),
            pipeline,
            serializer: Serializer::new(config.serialize, config.production),
            adapter,
            key_prefix: config.key_prefix.clone(),
            debounce: Duration::from_millis(config.debounce_ms),
            pending: Mutex::new(VecDeque::new()),
            last_state: Mutex::new(last_state),
            paused: AtomicBool::new(false),
            drain: Mutex::new(None),
        }
    }

    pub(crate) fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub(crate) fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Change-notification handler, invoked synchronously after every
    /// dispatch. Diffs the current state against the last-seen snapshot,
    /// enqueues changed persistable keys, and ensures a drain task runs.
    pub(crate) fn notify(scheduler: &Arc<Scheduler>) {
        if scheduler.paused.load(Ordering::SeqCst) {
            return;
        }

        let state = scheduler.container.get_state();

        let queue_len = {
            let mut pending = scheduler.pending.lock();
            let last = scheduler.last_state.lock();
            scheduler.adapter.iterate(&state, &mut |key, value| {
                if !scheduler.filter.should_persist(key) {
                    return;
                }
                if let Some(previous) = scheduler.adapter.get(&last, key) {
                    if Arc::ptr_eq(&previous, value) {
                        return;
                    }
                }
                if pending.iter().any(|queued| queued == key) {
                    return;
                }
                pending.push_back(key.to_string());
            });
            pending.len()
        };

        {
            let mut drain = scheduler.drain.lock();
            if drain.is_none() {
                *drain = Some(Self::spawn_drain(scheduler, queue_len));
            }
        }

        // Whole-tree swap, not per-key: the snapshot is replaced once the
        // full scan for this notification has finished.
        *scheduler.last_state.lock() = state;
    }

    /// Start the repeating drain task. `len_at_start` is the queue length
    /// observed when the task was scheduled; a pause stops the task only
    /// once no new keys have appeared since then.
    fn spawn_drain(scheduler: &Arc<Scheduler>, len_at_start: usize) -> JoinHandle<()> {
        let scheduler = Arc::clone(scheduler);
        // A zero debounce still needs a non-zero interval period.
        let period = scheduler.debounce.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Consume the immediate first tick so the first drain happens
            // one debounce period after scheduling.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let paused = scheduler.paused.load(Ordering::SeqCst);
                let next_key = {
                    let mut pending = scheduler.pending.lock();
                    if paused && pending.len() == len_at_start {
                        None
                    } else {
                        pending.pop_front()
                    }
                };

                let Some(key) = next_key else {
                    *scheduler.drain.lock() = None;
                    // A notification may have enqueued between the queue
                    // check and the handle release; restart if so.
                    let queued = scheduler.pending.lock().len();
                    if queued > 0 && !paused {
                        let mut drain = scheduler.drain.lock();
                        if drain.is_none() {
                            *drain = Some(Self::spawn_drain(&scheduler, queued));
                        }
                    }
                    return;
                };

                scheduler.drain_one(&key);
            }
        })
    }

    /// Persist a single queued key: read its current value (not the
    /// snapshot, so rapid updates coalesce into one write of the final
    /// value), transform, serialize, and fire off the storage write.
    fn drain_one(&self, key: &str) {
        let state = self.container.get_state();
        let Some(value) = self.adapter.get(&state, key) else {
            // Slice vanished while queued; nothing to write.
            return;
        };

        let transformed = match self.pipeline.apply_write((*value).clone(), key) {
            Ok(Some(transformed)) => transformed,
            Ok(None) => return,
            Err(e) => {
                warn!("skipping persist for key \"{}\": {}", key, e);
                return;
            }
        };

        let encoded = match self.serializer.encode_value(key, transformed) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("failed to serialize slice \"{}\": {}", key, e);
                return;
            }
        };

        // Fire-and-forget: a slow or failed write never stalls the drain
        // loop, and storage errors surface only as log events.
        let storage = Arc::clone(&self.storage);
        let storage_key = format!("{}{}", self.key_prefix, key);
        tokio::spawn(async move {
            if let Err(e) = storage.set_item(&storage_key, encoded).await {
                warn!("error storing data for key {}: {}", storage_key, e);
            }
        });
    }
}
