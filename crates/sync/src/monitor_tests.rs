// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the connectivity monitor.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use super::api_tests::MockApi;
use super::monitor::ConnectivityMonitor;
use super::test_helpers::settle;

fn make_monitor(api: &Arc<MockApi>) -> ConnectivityMonitor {
    let api: Arc<dyn crate::ReportApi> = api.clone();
    ConnectivityMonitor::new(api, Duration::from_secs(30))
}

#[tokio::test]
async fn initial_belief_is_unavailable() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    // Reachability is never assumed before a probe
    assert!(!monitor.is_available());
    assert_eq!(api.probe_count(), 0);
}

#[tokio::test]
async fn probe_now_updates_belief() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    assert!(monitor.probe_now().await);
    assert!(monitor.is_available());

    api.set_probe_ok(false);
    assert!(!monitor.probe_now().await);
    assert!(!monitor.is_available());
}

#[tokio::test]
async fn notify_offline_degrades_without_probing() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    monitor.probe_now().await;
    assert!(monitor.is_available());
    let probes_before = api.probe_count();

    monitor.notify_offline();

    assert!(!monitor.is_available());
    assert_eq!(api.probe_count(), probes_before);
}

#[tokio::test]
async fn notify_online_probes_immediately() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    assert!(monitor.notify_online().await);
    assert!(monitor.is_available());
    assert_eq!(api.probe_count(), 1);
}

#[tokio::test]
async fn online_event_does_not_trust_the_network_alone() {
    let api = Arc::new(MockApi::new());
    api.set_probe_ok(false);
    let monitor = make_monitor(&api);

    // Network is up but the server is not answering
    assert!(!monitor.notify_online().await);
    assert!(!monitor.is_available());
}

#[tokio::test(start_paused = true)]
async fn start_probes_immediately() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    monitor.start();
    settle().await;

    assert_eq!(api.probe_count(), 1);
    assert!(monitor.is_available());
    monitor.stop();
}

#[tokio::test(start_paused = true)]
async fn reprobes_on_interval() {
    let api = Arc::new(MockApi::new());
    api.set_probe_ok(false);
    let monitor = make_monitor(&api);

    monitor.start();
    settle().await;
    assert!(!monitor.is_available());

    // Server comes back; the next tick notices
    api.set_probe_ok(true);
    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;

    assert_eq!(api.probe_count(), 2);
    assert!(monitor.is_available());
    monitor.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_probing() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    monitor.start();
    settle().await;
    monitor.stop();

    let probes_before = api.probe_count();
    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;

    assert_eq!(api.probe_count(), probes_before);
}

#[tokio::test(start_paused = true)]
async fn double_start_is_ignored() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);

    monitor.start();
    monitor.start();
    settle().await;

    // A second probe loop would double the count per tick
    assert_eq!(api.probe_count(), 1);
    monitor.stop();
}

#[tokio::test]
async fn every_probe_result_is_published() {
    let api = Arc::new(MockApi::new());
    let monitor = make_monitor(&api);
    let mut beliefs = monitor.subscribe();

    monitor.probe_now().await;
    assert!(beliefs.changed().await.is_ok());
    assert!(*beliefs.borrow_and_update());

    // Same value again still reaches subscribers: each tick is a trigger
    monitor.probe_now().await;
    assert!(beliefs.changed().await.is_ok());
    assert!(*beliefs.borrow_and_update());
}
