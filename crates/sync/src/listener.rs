// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! In-process bus broadcasting sync status transitions.
//!
//! Broadcast is synchronous and in registration order. A panicking
//! subscriber is isolated and logged; the remaining subscribers still
//! receive the broadcast.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sw_core::SyncStatus;

type Callback = Arc<dyn Fn(SyncStatus, usize) + Send + Sync>;

#[derive(Clone)]
struct Entry {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

/// Observer registry for sync status broadcasts.
///
/// Cheap to clone; clones share the subscriber set.
#[derive(Clone, Default)]
pub struct ListenerBus {
    inner: Arc<Inner>,
}

impl ListenerBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback; the returned handle removes exactly this
    /// registration. Dropping the handle without calling
    /// [`Subscription::unsubscribe`] keeps the listener registered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(SyncStatus, usize) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Entry { id, callback: Arc::new(callback) });

        Subscription { id, inner: Arc::clone(&self.inner) }
    }

    /// Delivers a status to every current subscriber.
    pub fn broadcast(&self, status: SyncStatus, pending: usize) {
        // Snapshot outside the callbacks so a subscriber may unsubscribe
        // (itself or others) from within its callback.
        let entries: Vec<Entry> =
            self.inner.entries.lock().unwrap_or_else(|e| e.into_inner()).clone();

        for entry in entries {
            let delivery = catch_unwind(AssertUnwindSafe(|| (entry.callback)(status, pending)));
            if delivery.is_err() {
                tracing::warn!(listener = entry.id, %status, "listener panicked during broadcast");
            }
        }
    }

    /// Number of current subscribers.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True if no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a single listener registration.
pub struct Subscription {
    id: u64,
    inner: Arc<Inner>,
}

impl Subscription {
    /// Removes this registration. Later broadcasts are no longer delivered
    /// to the callback; other subscribers are unaffected.
    pub fn unsubscribe(self) {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|entry| entry.id != self.id);
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
