// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Offline actions: deferred mutations awaiting replay against the backend.
//!
//! An action is created by the enqueue operation, lives in the persisted
//! queue, and is destroyed either by a successful dispatch or by exhausting
//! its retry budget. Queue order is insertion order and is the order in
//! which actions are attempted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Default retry ceiling applied when a draft does not specify one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Unique identifier for an offline action.
///
/// Wall clock milliseconds plus a logical counter, assigned at enqueue time
/// by the [`ActionClock`](crate::clock::ActionClock). Ids are strictly
/// increasing, so they double as the FIFO ordering key.
///
/// Format: `{wall_ms}-{counter}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for actions enqueued in the same millisecond.
    pub counter: u32,
}

impl ActionId {
    /// Creates a new action id with the given components.
    pub fn new(wall_ms: u64, counter: u32) -> Self {
        ActionId { wall_ms, counter }
    }
}

impl Ord for ActionId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
    }
}

impl PartialOrd for ActionId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wall_ms, self.counter)
    }
}

impl FromStr for ActionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let (wall, counter) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidActionId(s.to_string()))?;

        let wall_ms = wall
            .parse::<u64>()
            .map_err(|_| Error::InvalidActionId(s.to_string()))?;

        let counter = counter
            .parse::<u32>()
            .map_err(|_| Error::InvalidActionId(s.to_string()))?;

        Ok(ActionId::new(wall_ms, counter))
    }
}

/// The mutation class of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Create a new entity on the backend.
    Create,
    /// Update an existing entity.
    Update,
    /// Delete an entity.
    Delete,
}

impl ActionKind {
    /// Returns the lowercase string form used in logs and dispatch errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "create" => Ok(ActionKind::Create),
            "update" => Ok(ActionKind::Update),
            "delete" => Ok(ActionKind::Delete),
            other => Err(Error::InvalidActionKind(other.to_string())),
        }
    }
}

/// A unit of deferred work persisted in the offline queue.
///
/// The payload is opaque to the queue; only the registered dispatch handler
/// for `(entity, kind)` interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineAction {
    /// Unique identifier, stable for the action's lifetime.
    pub id: ActionId,
    /// The mutation class.
    pub kind: ActionKind,
    /// Target domain type: `"job"`, `"bid"`, `"message"`, `"profile"`, ...
    pub entity: String,
    /// Entity-specific data, opaque to the queue.
    pub payload: Value,
    /// When the action was enqueued.
    pub enqueued_at: DateTime<Utc>,
    /// Failed attempts so far. Mutated only by the sync engine.
    pub retry_count: u32,
    /// Ceiling for `retry_count`; the action is dropped once reached.
    pub max_retries: u32,
    /// Cache keys to invalidate after a successful dispatch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalidation_keys: Vec<String>,
}

impl OfflineAction {
    /// Materializes a caller-supplied draft into a queued action.
    pub fn from_draft(draft: ActionDraft, id: ActionId, default_max_retries: u32) -> Self {
        let enqueued_at = DateTime::from_timestamp_millis(id.wall_ms as i64)
            .unwrap_or(DateTime::UNIX_EPOCH);

        OfflineAction {
            id,
            kind: draft.kind,
            entity: draft.entity,
            payload: draft.payload,
            enqueued_at,
            retry_count: 0,
            max_retries: draft.max_retries.unwrap_or(default_max_retries),
            invalidation_keys: draft.invalidation_keys,
        }
    }
}

/// Caller-facing input to the enqueue operation.
///
/// Id, timestamp and retry counter are assigned by the engine, not the
/// caller.
#[derive(Debug, Clone)]
pub struct ActionDraft {
    /// The mutation class.
    pub kind: ActionKind,
    /// Target domain type.
    pub entity: String,
    /// Entity-specific data.
    pub payload: Value,
    /// Retry ceiling; engine default applies when `None`.
    pub max_retries: Option<u32>,
    /// Cache keys to invalidate after a successful dispatch.
    pub invalidation_keys: Vec<String>,
}

impl ActionDraft {
    /// Creates a draft with the engine's default retry ceiling and no
    /// invalidation keys.
    pub fn new(kind: ActionKind, entity: impl Into<String>, payload: Value) -> Self {
        ActionDraft {
            kind,
            entity: entity.into(),
            payload,
            max_retries: None,
            invalidation_keys: Vec::new(),
        }
    }

    /// Sets an explicit retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the cache keys to invalidate on success.
    pub fn with_invalidation_keys(mut self, keys: Vec<String>) -> Self {
        self.invalidation_keys = keys;
        self
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
