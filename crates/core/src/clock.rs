// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Monotonic clock for assigning action identifiers.
//!
//! Wall clock milliseconds plus a logical counter. The counter advances when
//! the wall clock stalls or goes backwards, so two actions enqueued in the
//! same millisecond still get distinct, strictly increasing identifiers.

use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::action::ActionId;

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// A clock that produces strictly increasing action identifiers.
///
/// Thread-safe; handles a stalled or backwards wall clock by advancing the
/// logical counter instead.
pub struct ActionClock<C: ClockSource = SystemClock> {
    clock: C,
    last_wall_ms: Mutex<u64>,
    last_counter: AtomicU32,
}

impl ActionClock<SystemClock> {
    /// Creates a new action clock backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ActionClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> ActionClock<C> {
    /// Creates a new action clock with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        ActionClock { clock, last_wall_ms: Mutex::new(0), last_counter: AtomicU32::new(0) }
    }

    /// Generates the next action identifier.
    ///
    /// Guarantees strictly increasing ids even if the wall clock goes
    /// backwards.
    pub fn next(&self) -> ActionId {
        let physical = self.clock.now_ms();
        let mut last_ms = self.last_wall_ms.lock().unwrap_or_else(|e| e.into_inner());

        let (wall_ms, counter) = if physical > *last_ms {
            // Normal case: wall clock advanced
            *last_ms = physical;
            self.last_counter.store(0, AtomicOrdering::SeqCst);
            (physical, 0)
        } else {
            // Clock went backwards or stayed same: increment counter
            let counter = self.last_counter.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            (*last_ms, counter)
        };

        ActionId::new(wall_ms, counter)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
