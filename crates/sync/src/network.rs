// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Connectivity monitor seam.
//!
//! The engine polls connectivity before every sync pass and after every
//! enqueue; there is no subscription, and a connectivity-restored event does
//! not trigger a pass by itself. Platform shells implement [`NetworkMonitor`]
//! over whatever reachability API they have; [`FixedNetwork`] serves
//! embedding and tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Point-in-time connectivity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    /// Link-level connectivity (wifi or cellular association).
    pub connected: bool,
    /// Whether the internet is actually reachable over that link.
    pub internet_reachable: bool,
}

impl NetworkState {
    /// Fully online state.
    pub const ONLINE: NetworkState = NetworkState { connected: true, internet_reachable: true };

    /// Fully offline state.
    pub const OFFLINE: NetworkState = NetworkState { connected: false, internet_reachable: false };

    /// True only when connected and the internet is reachable.
    pub fn is_online(&self) -> bool {
        self.connected && self.internet_reachable
    }
}

/// Future type returned by [`NetworkMonitor::fetch`].
pub type NetworkFuture<'a> = Pin<Box<dyn Future<Output = NetworkState> + Send + 'a>>;

/// Connectivity query seam. Polled, never pushed.
pub trait NetworkMonitor: Send + Sync {
    /// Returns the current connectivity state.
    fn fetch(&self) -> NetworkFuture<'_>;
}

/// Monitor reporting a settable fixed state.
#[derive(Debug)]
pub struct FixedNetwork {
    state: Mutex<NetworkState>,
}

impl FixedNetwork {
    /// Creates a monitor reporting fully online.
    pub fn online() -> Self {
        FixedNetwork { state: Mutex::new(NetworkState::ONLINE) }
    }

    /// Creates a monitor reporting fully offline.
    pub fn offline() -> Self {
        FixedNetwork { state: Mutex::new(NetworkState::OFFLINE) }
    }

    /// Replaces the reported state.
    pub fn set(&self, state: NetworkState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

impl NetworkMonitor for FixedNetwork {
    fn fetch(&self) -> NetworkFuture<'_> {
        let state = *self.state.lock().unwrap_or_else(|e| e.into_inner());
        Box::pin(async move { state })
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
