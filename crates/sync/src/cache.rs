// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Cache invalidation seam.
//!
//! After a successful dispatch the engine forwards the action's
//! invalidation keys, unmodified, to the app's query-cache layer. The
//! engine does not interpret the keys or wait for any result beyond the
//! call itself.

use std::future::Future;
use std::pin::Pin;

/// Future type returned by [`CacheInvalidator::invalidate`].
pub type InvalidateFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Consumer of cache invalidation signals.
pub trait CacheInvalidator: Send + Sync {
    /// Invalidates the cached query results identified by `keys`.
    fn invalidate<'a>(&'a self, keys: &'a [String]) -> InvalidateFuture<'a>;
}
