// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! sw-core: Shared library for the sitework client core
//!
//! This crate provides the offline action data model, the monotonic action
//! clock, and the error types used by the sw-sync engine.

pub mod action;
pub mod clock;
pub mod error;
pub mod status;

pub use action::{ActionDraft, ActionId, ActionKind, OfflineAction, DEFAULT_MAX_RETRIES};
pub use clock::{ActionClock, ClockSource, SystemClock};
pub use error::Error;
pub use status::SyncStatus;
