// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Clock primitives for submission identity.
//!
//! Submission IDs are creation-time based: the wall clock in milliseconds,
//! bumped past the last issued value whenever the wall clock stalls or goes
//! backwards. This keeps IDs unique and strictly increasing on one device
//! without any coordination.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::submission::SubmissionId;

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

/// A generator that produces strictly increasing submission IDs.
///
/// Thread-safe. If the wall clock stalls or regresses, the next ID is the
/// last issued value plus one, so ordering by ID is always enqueue order.
pub struct SubmissionClock<C: ClockSource = SystemClock> {
    clock: C,
    last_ms: Mutex<u64>,
}

impl SubmissionClock<SystemClock> {
    /// Creates a new submission clock backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SubmissionClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> SubmissionClock<C> {
    /// Creates a new submission clock with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        SubmissionClock { clock, last_ms: Mutex::new(0) }
    }

    /// Issues the next submission ID.
    ///
    /// Guaranteed strictly greater than every ID issued before it by this
    /// generator, even if the wall clock goes backwards.
    pub fn next_id(&self) -> SubmissionId {
        let physical = self.clock.now_ms();
        let mut last = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());

        let ms = if physical > *last { physical } else { *last + 1 };
        *last = ms;

        SubmissionId::new(ms)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
