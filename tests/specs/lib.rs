// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Behavioural specs for the sitework client core.
//!
//! The files under `sync/` are compiled as `[[test]]` targets of the
//! `sw-sync` crate; each file is self-contained and drives the public API
//! end to end against a real file-backed store.
