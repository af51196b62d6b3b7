// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Sync status values broadcast to listeners.

use std::fmt;

/// Transient queue status, broadcast with the current pending count.
///
/// Never persisted; each sync pass re-derives it from the surviving queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// An action was enqueued and is awaiting sync.
    Pending,
    /// A sync pass is running.
    Syncing,
    /// The last pass left the queue empty.
    Synced,
    /// The last pass left actions behind, or the pass itself failed.
    Error,
}

impl SyncStatus {
    /// Returns the lowercase string form used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
