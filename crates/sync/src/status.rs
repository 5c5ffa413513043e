// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only sync status projection for UI consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A consistent snapshot of the sync engine's observable state.
///
/// Purely observational: nothing here mutates queue or session state. The
/// pending count is the only per-item signal surfaced to users; individual
/// failures stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last-known reachability of the report endpoint.
    pub server_available: bool,
    /// True while a drain pass is in flight.
    pub syncing: bool,
    /// Number of submissions awaiting replay.
    pub pending: u64,
    /// Completion time of the last drain pass, if any.
    pub last_sync_at: Option<DateTime<Utc>>,
}
