// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Durable queue store: persists the pending action list as one document.
//!
//! The queue is a single JSON array of actions kept under one path, mirroring
//! the single key-value entry the mobile shell uses. `save` replaces the
//! whole list atomically (temp file + rename); a missing or corrupt document
//! loads as an empty queue rather than an error, so a damaged store never
//! wedges the engine.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use sw_core::OfflineAction;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Future type returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Persistence seam for the offline queue.
///
/// Every operation must appear atomic to a subsequent `load`; callers never
/// observe a partially written list.
pub trait QueueStore: Send + Sync {
    /// Loads the persisted queue. Absent or corrupt data loads as empty.
    fn load(&self) -> StoreFuture<'_, Vec<OfflineAction>>;

    /// Atomically replaces the persisted queue with the given list.
    fn save<'a>(&'a self, actions: &'a [OfflineAction]) -> StoreFuture<'a, ()>;

    /// Removes the persisted queue entirely.
    fn clear(&self) -> StoreFuture<'_, ()>;
}

/// File-backed queue store.
///
/// The whole queue lives in one JSON document; writes go through a sibling
/// temp file and a rename so a crash mid-write leaves the previous document
/// intact.
pub struct FileStore {
    /// Path of the queue document.
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at the given path, creating parent directories.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(FileStore { path: path.to_path_buf() })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl QueueStore for FileStore {
    fn load(&self) -> StoreFuture<'_, Vec<OfflineAction>> {
        Box::pin(async move {
            let bytes = match tokio::fs::read(&self.path).await {
                Ok(b) => b,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };

            if bytes.is_empty() {
                return Ok(Vec::new());
            }

            match serde_json::from_slice(&bytes) {
                Ok(actions) => Ok(actions),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "corrupt queue document, treating as empty: {e}"
                    );
                    Ok(Vec::new())
                }
            }
        })
    }

    fn save<'a>(&'a self, actions: &'a [OfflineAction]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let json = serde_json::to_vec(actions)?;
            let tmp = self.tmp_path();
            tokio::fs::write(&tmp, &json).await?;
            tokio::fs::rename(&tmp, &self.path).await?;
            Ok(())
        })
    }

    fn clear(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// In-memory queue store for tests and ephemeral embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<OfflineAction>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueStore for MemoryStore {
    fn load(&self) -> StoreFuture<'_, Vec<OfflineAction>> {
        Box::pin(async move {
            Ok(self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone())
        })
    }

    fn save<'a>(&'a self, actions: &'a [OfflineAction]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = actions.to_vec();
            Ok(())
        })
    }

    fn clear(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
