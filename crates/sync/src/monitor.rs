// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Maintains a best-effort, continuously refreshed belief about whether the
//! report endpoint is reachable. The belief is refreshed by an immediate
//! probe on [`start`](ConnectivityMonitor::start), a fixed probe interval,
//! and host-environment online/offline transitions. Probe failures degrade
//! the belief to unavailable and are otherwise swallowed — the monitor can
//! never crash the host.
//!
//! Every probe result is published to subscribers, even when the belief is
//! unchanged, so each interval tick doubles as a natural sync trigger.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::ReportApi;

/// Periodic + reactive reachability belief for the report endpoint.
pub struct ConnectivityMonitor {
    api: Arc<dyn ReportApi>,
    belief: Arc<watch::Sender<bool>>,
    probe_interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectivityMonitor {
    /// Creates a monitor. The initial belief is unavailable until a probe
    /// says otherwise; reachability is never assumed across restarts.
    pub fn new(api: Arc<dyn ReportApi>, probe_interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(false);
        ConnectivityMonitor {
            api,
            belief: Arc::new(tx),
            probe_interval,
            task: Mutex::new(None),
        }
    }

    /// Current belief, synchronously. Never blocks on a fresh probe.
    pub fn is_available(&self) -> bool {
        *self.belief.borrow()
    }

    /// Subscribes to probe results.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.belief.subscribe()
    }

    /// Starts the periodic probe task. Calling `start` again while running
    /// is a no-op.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.is_some() {
            tracing::warn!("connectivity monitor already started, ignoring");
            return;
        }

        let api = Arc::clone(&self.api);
        let belief = Arc::clone(&self.belief);
        let probe_interval = self.probe_interval;

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(probe_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick fires immediately: probe on startup
            loop {
                ticker.tick().await;
                let available = api.probe().await;
                publish(&belief, available);
            }
        }));
    }

    /// Stops the periodic probe task.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }

    /// Probes once and updates the belief. Used at host online transitions
    /// and anywhere an immediate refresh is wanted.
    pub async fn probe_now(&self) -> bool {
        let available = self.api.probe().await;
        publish(&self.belief, available);
        available
    }

    /// Host environment reported a network-online transition: re-probe
    /// immediately (the network being up does not mean the server is).
    pub async fn notify_online(&self) -> bool {
        tracing::debug!("host reported network online");
        self.probe_now().await
    }

    /// Host environment reported a network-offline transition: the endpoint
    /// is unreachable by definition, no probe needed.
    pub fn notify_offline(&self) {
        tracing::debug!("host reported network offline");
        publish(&self.belief, false);
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Publishes a probe result, logging belief transitions.
fn publish(belief: &watch::Sender<bool>, available: bool) {
    let was = *belief.borrow();
    if was != available {
        if available {
            tracing::info!("report endpoint reachable");
        } else {
            tracing::warn!("report endpoint unreachable");
        }
    }
    belief.send_replace(available);
}
