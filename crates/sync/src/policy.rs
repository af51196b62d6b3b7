// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Retry and removal policy for failed dispatch attempts.
//!
//! Every failure consumes retry budget the same way, whether it was a
//! transient backend error or an unsupported operation. An action whose
//! counter reaches its ceiling is removed permanently and never persisted
//! again.

use sw_core::OfflineAction;

/// What to do with an action after a failed dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep the action queued, at its original position, for the next pass.
    Retry,
    /// Retry budget exhausted: remove the action permanently.
    Drop,
}

/// Records a failed attempt against the action's retry budget.
///
/// Increments `retry_count` and decides whether the action survives. An
/// action with `max_retries` of zero is dropped on its first failure.
pub fn after_failure(action: &mut OfflineAction) -> Disposition {
    action.retry_count = action.retry_count.saturating_add(1);
    if action.retry_count >= action.max_retries {
        Disposition::Drop
    } else {
        Disposition::Retry
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
