// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Error types for sw-core operations.

use thiserror::Error;

/// All possible errors that can occur in sw-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid action id: '{0}'\n  hint: expected format 'wall_ms-counter'")]
    InvalidActionId(String),

    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: create, update, delete")]
    InvalidActionKind(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
