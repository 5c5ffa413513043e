// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Submission identity and the pending-submission record.
//!
//! A [`PendingSubmission`] is a form payload that failed or skipped the
//! live-submission path and awaits replay. The payload is opaque to the
//! queue: an arbitrary JSON object, including nested arrays for photos and
//! materials. By convention it carries a `folio` field — the unique
//! reference code the remote endpoint uses to reject duplicate-acceptance
//! attempts as a harmless no-op.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Unique, monotonically increasing identifier for one logical submission.
///
/// The value is the creation wall time in milliseconds since Unix epoch
/// (bumped past the previous ID when the clock stalls), so sorting by ID is
/// sorting by enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(u64);

impl SubmissionId {
    /// Creates a submission ID from a millisecond timestamp.
    pub fn new(ms: u64) -> Self {
        SubmissionId(ms)
    }

    /// Returns the raw millisecond value.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the creation instant this ID encodes.
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0 as i64).single().unwrap_or_default()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubmissionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>().map(SubmissionId).map_err(|_| Error::InvalidSubmissionId(s.to_string()))
    }
}

/// A queued form submission awaiting confirmed delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubmission {
    /// Queue key and dedup key.
    pub id: SubmissionId,
    /// The full form data blob, opaque to the queue.
    pub payload: serde_json::Value,
    /// When the submission was first enqueued.
    pub created_at: DateTime<Utc>,
    /// Set on confirmed server acceptance; `None` means still pending.
    ///
    /// A confirmed entry is removed from the store rather than flagged, so
    /// persisted rows always carry `None` here.
    pub synced_at: Option<DateTime<Utc>>,
}

impl PendingSubmission {
    /// Creates a pending record whose `created_at` is derived from the ID.
    pub fn new(id: SubmissionId, payload: serde_json::Value) -> Self {
        PendingSubmission { id, payload, created_at: id.created_at(), synced_at: None }
    }

    /// Returns the folio carried in the payload, if any.
    pub fn folio(&self) -> Option<&str> {
        self.payload.get("folio").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
