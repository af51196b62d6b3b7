// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Shared test helpers for sw-sync tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use sw_core::{ActionDraft, ActionKind, OfflineAction, SyncStatus};

use crate::cache::{CacheInvalidator, InvalidateFuture};
use crate::dispatch::{DispatchError, DispatchRegistry};
use crate::engine::{SyncConfig, SyncEngine};
use crate::network::FixedNetwork;
use crate::store::{MemoryStore, QueueStore, StoreError, StoreFuture};

/// Create a draft for the given entity and kind with a small payload.
pub fn make_draft(entity: &str, kind: ActionKind) -> ActionDraft {
    ActionDraft::new(kind, entity, json!({ "title": "fix the fence" }))
}

/// Scripted dispatch outcomes plus an invocation counter.
///
/// Outcomes are consumed front to back; once the script runs out every
/// further call succeeds.
pub struct DispatchScript {
    calls: Arc<AtomicUsize>,
    outcomes: Arc<Mutex<VecDeque<Result<(), String>>>>,
    delay: Duration,
}

impl DispatchScript {
    pub fn new(outcomes: Vec<Result<(), String>>) -> Self {
        DispatchScript {
            calls: Arc::new(AtomicUsize::new(0)),
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            delay: Duration::ZERO,
        }
    }

    pub fn always_ok() -> Self {
        Self::new(Vec::new())
    }

    /// A script whose trailing failure repeats forever.
    pub fn always_failing() -> Self {
        Self::new(vec![Err("scripted failure".to_string())])
    }

    /// Make every handler call sleep before resolving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Register this script as the handler for `(entity, kind)`.
    pub fn install(&self, registry: &mut DispatchRegistry, entity: &str, kind: ActionKind) {
        let calls = Arc::clone(&self.calls);
        let outcomes = Arc::clone(&self.outcomes);
        let delay = self.delay;

        registry.register(entity, kind, move |_payload| {
            calls.fetch_add(1, Ordering::SeqCst);
            let outcome = {
                let mut script = outcomes.lock().unwrap();
                let next = script.pop_front();
                // A trailing failure repeats forever; an exhausted script
                // otherwise succeeds.
                if let (Some(Err(msg)), true) = (&next, script.is_empty()) {
                    script.push_back(Err(msg.clone()));
                }
                next
            };
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match outcome {
                    None | Some(Ok(())) => Ok(()),
                    Some(Err(msg)) => Err(DispatchError::Backend(msg)),
                }
            }
        });
    }
}

/// Cache invalidator that records every forwarded key set.
#[derive(Default)]
pub struct RecordingInvalidator {
    seen: Mutex<Vec<Vec<String>>>,
}

impl RecordingInvalidator {
    pub fn seen(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl CacheInvalidator for RecordingInvalidator {
    fn invalidate<'a>(&'a self, keys: &'a [String]) -> InvalidateFuture<'a> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(keys.to_vec());
        })
    }
}

/// Store wrapper with injectable load/save failures.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail_load: AtomicBool,
    pub fail_save: AtomicBool,
}

impl QueueStore for FlakyStore {
    fn load(&self) -> StoreFuture<'_, Vec<OfflineAction>> {
        Box::pin(async move {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other("injected load failure")));
            }
            self.inner.load().await
        })
    }

    fn save<'a>(&'a self, actions: &'a [OfflineAction]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other("injected save failure")));
            }
            self.inner.save(actions).await
        })
    }

    fn clear(&self) -> StoreFuture<'_, ()> {
        self.inner.clear()
    }
}

/// An engine wired to an in-memory store and a settable network.
pub struct TestEngine {
    pub engine: SyncEngine,
    pub store: Arc<MemoryStore>,
    pub network: Arc<FixedNetwork>,
}

pub fn engine_with(registry: DispatchRegistry, online: bool) -> TestEngine {
    let store = Arc::new(MemoryStore::new());
    let network =
        Arc::new(if online { FixedNetwork::online() } else { FixedNetwork::offline() });
    let engine = SyncEngine::new(
        store.clone(),
        network.clone(),
        Arc::new(registry),
        SyncConfig::default(),
    );
    TestEngine { engine, store, network }
}

/// Subscribe a collector that records every broadcast.
///
/// The subscription handle is dropped deliberately; dropping does not
/// unsubscribe, so the collector stays registered.
pub fn collect_statuses(engine: &SyncEngine) -> Arc<Mutex<Vec<(SyncStatus, usize)>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let _subscription = engine.subscribe(move |status, pending| {
        sink.lock().unwrap().push((status, pending));
    });
    log
}
