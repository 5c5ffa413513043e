// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator.
//!
//! The only component allowed to drain the submission queue against the
//! network. A drain pass takes a snapshot of the queue, replays it strictly
//! oldest-first, and removes each entry only on confirmed acceptance —
//! including the duplicate-folio confirmation an at-least-once replay can
//! produce. One item's failure never blocks the rest of the pass.
//!
//! At most one drain pass is in flight at any time; a trigger arriving
//! while a pass is running is ignored, not deferred.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use folio_core::{Result, Store};

use crate::api::{ReportApi, SubmitOutcome};

/// Accounting for one completed drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items attempted (the snapshot size).
    pub attempted: usize,
    /// Items confirmed by the server and removed from the queue.
    pub delivered: usize,
    /// Items that failed and stay queued for the next pass.
    pub retained: usize,
}

/// Drives drain passes over the submission queue.
pub struct SyncOrchestrator {
    store: Arc<Store>,
    api: Arc<dyn ReportApi>,
    syncing: AtomicBool,
    last_sync_at: Mutex<Option<DateTime<Utc>>>,
}

/// Releases the drain guard when the pass ends, normally or early.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncOrchestrator {
    /// Creates an orchestrator over the given store and API.
    pub fn new(store: Arc<Store>, api: Arc<dyn ReportApi>) -> Self {
        SyncOrchestrator {
            store,
            api,
            syncing: AtomicBool::new(false),
            last_sync_at: Mutex::new(None),
        }
    }

    /// True only while a drain pass is in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Completion time of the last drain pass that attempted any items.
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        *self.last_sync_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attempts one drain pass.
    ///
    /// Returns `Ok(None)` when a pass is already in flight (the trigger is
    /// a no-op). Otherwise replays the current queue snapshot and returns
    /// the per-pass accounting. Storage errors propagate; the guard is
    /// released either way.
    pub async fn try_drain(&self) -> Result<Option<DrainReport>> {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("drain already in flight, ignoring trigger");
            return Ok(None);
        }
        let _guard = DrainGuard(&self.syncing);

        let snapshot = self.store.list_pending()?;
        if snapshot.is_empty() {
            tracing::debug!("queue empty, nothing to drain");
            return Ok(Some(DrainReport::default()));
        }

        tracing::info!(pending = snapshot.len(), "drain pass starting");
        let mut report = DrainReport::default();

        // Snapshot order is enqueue order; items enqueued mid-pass wait
        // for the next trigger.
        for submission in &snapshot {
            report.attempted += 1;
            match self.api.submit(&submission.payload).await {
                SubmitOutcome::Accepted => {
                    self.store.remove(submission.id)?;
                    report.delivered += 1;
                    tracing::info!(id = %submission.id, "submission accepted");
                }
                SubmitOutcome::AlreadyAccepted => {
                    self.store.remove(submission.id)?;
                    report.delivered += 1;
                    tracing::info!(id = %submission.id, "folio already accepted, dequeued");
                }
                SubmitOutcome::Retryable(reason) => {
                    report.retained += 1;
                    tracing::warn!(id = %submission.id, %reason, "submission failed, kept queued");
                }
                SubmitOutcome::Rejected { status, message } => {
                    report.retained += 1;
                    tracing::warn!(
                        id = %submission.id,
                        status,
                        %message,
                        "submission rejected, kept queued for manual intervention"
                    );
                }
            }
        }

        *self.last_sync_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(Utc::now());
        tracing::info!(
            delivered = report.delivered,
            retained = report.retained,
            "drain pass complete"
        );
        Ok(Some(report))
    }
}
