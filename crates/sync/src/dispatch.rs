// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Action dispatch: maps `(entity, kind)` to a concrete backend call.
//!
//! Resolution is a two-level lookup: entity first, then kind within the
//! entity's handler set. Handlers are registered at initialization; an
//! unregistered combination fails fast with [`DispatchError::Unsupported`].
//! The engine does not interpret failures beyond "attempt failed", so an
//! unsupported combination consumes retry budget exactly like a backend
//! failure (kept for compatibility with the shipped client).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use sw_core::ActionKind;

/// Error type for dispatch operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No handler registered for this `(entity, kind)` pair.
    #[error("unsupported operation: {kind} on '{entity}'")]
    Unsupported {
        /// The entity with no matching handler.
        entity: String,
        /// The kind the entity's handler set does not cover.
        kind: ActionKind,
    },

    /// The backend call failed.
    #[error("backend call failed: {0}")]
    Backend(String),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Future type returned by dispatch handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = DispatchResult<()>> + Send>>;

type Handler = Box<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Registry of backend-call handlers keyed by entity, then kind.
///
/// Populated once at process start and shared immutably with the engine.
#[derive(Default)]
pub struct DispatchRegistry {
    handlers: HashMap<String, HashMap<ActionKind, Handler>>,
}

impl DispatchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for an `(entity, kind)` pair.
    ///
    /// A second registration for the same pair replaces the first.
    pub fn register<F, Fut>(&mut self, entity: impl Into<String>, kind: ActionKind, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<()>> + Send + 'static,
    {
        self.handlers
            .entry(entity.into())
            .or_default()
            .insert(kind, Box::new(move |payload| Box::pin(handler(payload))));
    }

    /// True if a handler is registered for the pair.
    pub fn supports(&self, entity: &str, kind: ActionKind) -> bool {
        self.handlers.get(entity).is_some_and(|kinds| kinds.contains_key(&kind))
    }

    /// Executes the registered handler for the pair.
    pub async fn execute(
        &self,
        kind: ActionKind,
        entity: &str,
        payload: Value,
    ) -> DispatchResult<()> {
        let handler = self
            .handlers
            .get(entity)
            .and_then(|kinds| kinds.get(&kind))
            .ok_or_else(|| DispatchError::Unsupported { entity: entity.to_string(), kind })?;

        handler(payload).await
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
