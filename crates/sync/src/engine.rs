// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! The sync engine: accepts actions, persists them, and drains the queue.
//!
//! One engine instance is constructed at process start and cloned into any
//! caller that needs it; clones share state. At most one sync pass runs at
//! a time (single-flight), and a pass drains strictly in FIFO order so
//! ordered mutations on one entity (create-then-update) replay in causal
//! order.
//!
//! Known limitation: an enqueue's load-append-save and a running pass's own
//! load/save are not serialized against each other. The store's atomic
//! replace prevents corruption, but an append racing a pass's save can lose
//! the appended action until the next enqueue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sw_core::{ActionClock, ActionDraft, ActionId, OfflineAction, SyncStatus, DEFAULT_MAX_RETRIES};

use crate::cache::CacheInvalidator;
use crate::dispatch::DispatchRegistry;
use crate::listener::{ListenerBus, Subscription};
use crate::network::NetworkMonitor;
use crate::policy::{self, Disposition};
use crate::store::{QueueStore, StoreError};

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Retry ceiling applied to drafts that do not specify one.
    pub default_max_retries: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig { default_max_retries: DEFAULT_MAX_RETRIES }
    }
}

/// Error type for engine operations surfaced to direct callers.
///
/// Only enqueue-path persistence failures reach callers; everything inside
/// a sync pass is absorbed into status broadcasts and logs.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Queue store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

struct EngineInner {
    store: Arc<dyn QueueStore>,
    network: Arc<dyn NetworkMonitor>,
    registry: Arc<DispatchRegistry>,
    invalidator: Option<Arc<dyn CacheInvalidator>>,
    bus: ListenerBus,
    clock: ActionClock,
    config: SyncConfig,
    /// Single-flight guard. Process-wide, never persisted.
    sync_in_progress: AtomicBool,
}

/// Offline queue orchestrator.
///
/// Cheap to clone; clones share the queue, the single-flight guard and the
/// subscriber set.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

/// Clears the single-flight flag when dropped, so every exit from a pass
/// releases the engine, including an unwinding one.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    /// Creates an engine without a cache invalidator.
    pub fn new(
        store: Arc<dyn QueueStore>,
        network: Arc<dyn NetworkMonitor>,
        registry: Arc<DispatchRegistry>,
        config: SyncConfig,
    ) -> Self {
        Self::build(store, network, registry, None, config)
    }

    /// Creates an engine that forwards invalidation keys after successful
    /// dispatches.
    pub fn with_invalidator(
        store: Arc<dyn QueueStore>,
        network: Arc<dyn NetworkMonitor>,
        registry: Arc<DispatchRegistry>,
        invalidator: Arc<dyn CacheInvalidator>,
        config: SyncConfig,
    ) -> Self {
        Self::build(store, network, registry, Some(invalidator), config)
    }

    fn build(
        store: Arc<dyn QueueStore>,
        network: Arc<dyn NetworkMonitor>,
        registry: Arc<DispatchRegistry>,
        invalidator: Option<Arc<dyn CacheInvalidator>>,
        config: SyncConfig,
    ) -> Self {
        SyncEngine {
            inner: Arc::new(EngineInner {
                store,
                network,
                registry,
                invalidator,
                bus: ListenerBus::new(),
                clock: ActionClock::new(),
                config,
                sync_in_progress: AtomicBool::new(false),
            }),
        }
    }

    /// Registers a status listener.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(SyncStatus, usize) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(callback)
    }

    /// True while a sync pass is running.
    pub fn is_syncing(&self) -> bool {
        self.inner.sync_in_progress.load(Ordering::SeqCst)
    }

    /// Number of actions currently persisted in the queue.
    pub async fn pending_count(&self) -> SyncResult<usize> {
        Ok(self.inner.store.load().await?.len())
    }

    /// Removes every pending action without attempting it.
    pub async fn clear_queue(&self) -> SyncResult<()> {
        self.inner.store.clear().await?;
        Ok(())
    }

    /// Persists a new action and returns its assigned id.
    ///
    /// If the device is online a sync pass is triggered in the background;
    /// the caller is never blocked on its completion. A persistence failure
    /// propagates and the action is not queued.
    pub async fn enqueue(&self, draft: ActionDraft) -> SyncResult<ActionId> {
        let id = self.inner.clock.next();
        let action = OfflineAction::from_draft(draft, id, self.inner.config.default_max_retries);

        let mut queue = self.inner.store.load().await?;
        queue.push(action);
        self.inner.store.save(&queue).await?;

        tracing::debug!(%id, pending = queue.len(), "action enqueued");

        if self.inner.network.fetch().await.is_online() {
            self.trigger_sync();
        }

        self.inner.bus.broadcast(SyncStatus::Pending, queue.len());
        Ok(id)
    }

    /// Spawns a fire-and-forget sync pass.
    fn trigger_sync(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            engine.sync_queue().await;
        });
    }

    /// Runs one sync pass: drains the queue sequentially and persists the
    /// survivors.
    ///
    /// No-op when a pass is already running (the trigger is dropped, not
    /// queued) or when the device is offline. The pass never returns an
    /// error; failures, including a panicking dispatch handler, are reported
    /// through the status broadcast and logs.
    pub async fn sync_queue(&self) {
        if self
            .inner
            .sync_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::trace!("sync pass already running, trigger dropped");
            return;
        }
        let _in_flight = InFlight { flag: &self.inner.sync_in_progress };

        if !self.inner.network.fetch().await.is_online() {
            tracing::debug!("offline, skipping sync pass");
            return;
        }

        // Transitional signal; the count is not yet known.
        self.inner.bus.broadcast(SyncStatus::Syncing, 0);

        // The drain runs on its own task so a panic in an app-supplied
        // dispatch handler cannot unwind through the engine; it surfaces
        // here as a join error instead.
        let engine = self.clone();
        match tokio::spawn(async move { engine.drain().await }).await {
            Ok(Ok(pending)) => {
                let status = if pending == 0 { SyncStatus::Synced } else { SyncStatus::Error };
                self.inner.bus.broadcast(status, pending);
            }
            Ok(Err(e)) => {
                tracing::error!("sync pass failed: {e}");
                self.inner.bus.broadcast(SyncStatus::Error, 0);
            }
            Err(e) => {
                tracing::error!("sync pass panicked: {e}");
                self.inner.bus.broadcast(SyncStatus::Error, 0);
            }
        }
    }

    /// Attempts every queued action in FIFO order and persists the
    /// survivors. Returns the surviving count.
    async fn drain(&self) -> SyncResult<usize> {
        let queue = self.inner.store.load().await?;
        if queue.is_empty() {
            return Ok(0);
        }

        tracing::debug!(pending = queue.len(), "sync pass started");

        let mut survivors: Vec<OfflineAction> = Vec::new();
        let mut synced = 0usize;

        for mut action in queue {
            let outcome = self
                .inner
                .registry
                .execute(action.kind, &action.entity, action.payload.clone())
                .await;

            match outcome {
                Ok(()) => {
                    synced += 1;
                    if !action.invalidation_keys.is_empty() {
                        if let Some(invalidator) = &self.inner.invalidator {
                            invalidator.invalidate(&action.invalidation_keys).await;
                        }
                    }
                }
                Err(err) => match policy::after_failure(&mut action) {
                    Disposition::Retry => {
                        tracing::debug!(
                            id = %action.id,
                            entity = %action.entity,
                            retry = action.retry_count,
                            "dispatch failed, will retry: {err}"
                        );
                        survivors.push(action);
                    }
                    Disposition::Drop => {
                        tracing::warn!(
                            id = %action.id,
                            entity = %action.entity,
                            attempts = action.retry_count,
                            "dropping action after exhausting retries: {err}"
                        );
                    }
                },
            }
        }

        self.inner.store.save(&survivors).await?;
        tracing::debug!(synced, pending = survivors.len(), "sync pass finished");
        Ok(survivors.len())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
