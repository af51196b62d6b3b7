// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! sw-sync: Offline action queue and synchronization engine.
//!
//! Persists user-initiated mutations while the device is disconnected and
//! replays them against the backend once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐ enqueue ┌────────────┐ execute ┌──────────────┐
//! │  Caller  │────────►│ SyncEngine │────────►│   Dispatch   │──► backend
//! └──────────┘         │            │         │   Registry   │
//!       ▲              └──┬───────┬─┘         └──────────────┘
//!       │ status  load/save│       │fetch
//! ┌─────┴──────┐    ┌─────▼────┐ ┌─▼──────────────┐
//! │ListenerBus │◄───│QueueStore│ │ NetworkMonitor │
//! └────────────┘    └──────────┘ └────────────────┘
//! ```
//!
//! # Features
//!
//! - Durable FIFO queue persisted as a single JSON document
//! - Sequential drain preserving per-entity causal order
//! - Single-flight guard: at most one sync pass at a time
//! - Retry-then-drop policy with per-action ceilings
//! - Injectable store, network and dispatch seams for testing

pub mod cache;
pub mod dispatch;
pub mod engine;
pub mod listener;
pub mod network;
pub mod policy;
pub mod store;

pub use cache::CacheInvalidator;
pub use dispatch::{DispatchError, DispatchRegistry, DispatchResult};
pub use engine::{SyncConfig, SyncEngine, SyncError, SyncResult};
pub use listener::{ListenerBus, Subscription};
pub use network::{FixedNetwork, NetworkMonitor, NetworkState};
pub use policy::Disposition;
pub use store::{FileStore, MemoryStore, QueueStore, StoreError, StoreResult};

#[cfg(test)]
mod test_helpers;
