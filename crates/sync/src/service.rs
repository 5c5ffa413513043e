// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync service facade.
//!
//! [`SyncService`] is the injected entry point for application code: it
//! owns the store, the report API, the connectivity monitor, and the
//! orchestrator, and wires connectivity events to drain passes. Consumers
//! receive it as an explicit dependency rather than reaching for ambient
//! global state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::{PendingSubmission, Result, Store, SubmissionClock, SubmissionId};
use tokio::task::JoinHandle;

use crate::api::ReportApi;
use crate::config::SyncConfig;
use crate::monitor::ConnectivityMonitor;
use crate::orchestrator::{DrainReport, SyncOrchestrator};
use crate::status::SyncStatus;

/// What happened to a submission handed to [`SyncService::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReceipt {
    /// The server confirmed the report during the live attempt.
    Delivered,
    /// The report was durably queued and will be replayed later.
    Queued {
        /// Queue key of the stored submission.
        id: SubmissionId,
    },
}

/// Facade over the offline-first submission pipeline.
pub struct SyncService {
    store: Arc<Store>,
    api: Arc<dyn ReportApi>,
    clock: SubmissionClock,
    monitor: Arc<ConnectivityMonitor>,
    orchestrator: Arc<SyncOrchestrator>,
    draft_name: String,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncService {
    /// Builds the service around an existing store and API implementation.
    pub fn new(store: Arc<Store>, api: Arc<dyn ReportApi>, config: &SyncConfig) -> Self {
        let monitor = Arc::new(ConnectivityMonitor::new(
            Arc::clone(&api),
            Duration::from_secs(config.probe_interval_secs),
        ));
        let orchestrator = Arc::new(SyncOrchestrator::new(Arc::clone(&store), Arc::clone(&api)));

        SyncService {
            store,
            api,
            clock: SubmissionClock::new(),
            monitor,
            orchestrator,
            draft_name: config.draft_name.clone(),
            drain_task: Mutex::new(None),
        }
    }

    /// Starts the background tasks: the connectivity probe loop and the
    /// drain trigger that reacts to its results. Idempotent.
    pub fn start(&self) {
        let mut task = self.drain_task.lock().unwrap_or_else(|e| e.into_inner());
        if task.is_none() {
            let mut beliefs = self.monitor.subscribe();
            let orchestrator = Arc::clone(&self.orchestrator);
            *task = Some(tokio::spawn(async move {
                while beliefs.changed().await.is_ok() {
                    let available = *beliefs.borrow_and_update();
                    if !available {
                        continue;
                    }
                    if let Err(e) = orchestrator.try_drain().await {
                        tracing::error!("drain pass failed: {e}");
                    }
                }
            }));
        }
        drop(task);

        self.monitor.start();
    }

    /// Stops the background tasks.
    pub fn stop(&self) {
        self.monitor.stop();
        if let Some(handle) = self.drain_task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }

    /// Submits a report: live when the endpoint is believed reachable,
    /// otherwise (or on a failed live attempt) durably queued.
    ///
    /// A storage failure on the queued path propagates — the caller must
    /// surface it rather than claim the form was saved.
    pub async fn submit(&self, payload: serde_json::Value) -> Result<SubmitReceipt> {
        if self.monitor.is_available() {
            let outcome = self.api.submit(&payload).await;
            if outcome.is_delivered() {
                tracing::info!("report delivered live");
                return Ok(SubmitReceipt::Delivered);
            }
            tracing::warn!(?outcome, "live submission failed, queueing for replay");
        }

        let id = self.clock.next_id();
        let submission = PendingSubmission::new(id, payload);
        self.store.enqueue(&submission)?;
        tracing::info!(%id, "report queued for replay");
        Ok(SubmitReceipt::Queued { id })
    }

    /// Manual "sync now" trigger. A no-op (returning `Ok(None)`) while a
    /// drain pass is already in flight.
    pub async fn sync_now(&self) -> Result<Option<DrainReport>> {
        self.orchestrator.try_drain().await
    }

    /// Host environment reported a network-online transition.
    pub async fn notify_online(&self) -> bool {
        self.monitor.notify_online().await
    }

    /// Host environment reported a network-offline transition.
    pub fn notify_offline(&self) {
        self.monitor.notify_offline();
    }

    /// Consistent snapshot of the observable sync state.
    pub fn status(&self) -> Result<SyncStatus> {
        Ok(SyncStatus {
            server_available: self.monitor.is_available(),
            syncing: self.orchestrator.is_syncing(),
            pending: self.store.count()?,
            last_sync_at: self.orchestrator.last_sync_at(),
        })
    }

    /// Saves the in-progress form draft.
    pub fn save_draft(&self, payload: &serde_json::Value) -> Result<()> {
        self.store.save_draft(&self.draft_name, payload)
    }

    /// Loads the in-progress form draft, if any.
    pub fn load_draft(&self) -> Result<Option<serde_json::Value>> {
        self.store.load_draft(&self.draft_name)
    }

    /// Discards the in-progress form draft.
    pub fn clear_draft(&self) -> Result<()> {
        self.store.clear_draft(&self.draft_name)
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        self.stop();
    }
}
