// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the sync service facade.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use folio_core::Store;
use serde_json::json;

use super::api::SubmitOutcome;
use super::api_tests::MockApi;
use super::config::SyncConfig;
use super::service::{SubmitReceipt, SyncService};
use super::test_helpers::make_payload;

fn make_service(api: &Arc<MockApi>) -> (Arc<Store>, SyncService) {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let api: Arc<dyn crate::ReportApi> = api.clone();
    let service = SyncService::new(Arc::clone(&store), api, &SyncConfig::default());
    (store, service)
}

#[tokio::test]
async fn submit_queues_when_believed_offline() {
    let api = Arc::new(MockApi::new());
    let (store, service) = make_service(&api);

    let receipt = service.submit(make_payload("F-001")).await.unwrap();

    assert!(matches!(receipt, SubmitReceipt::Queued { .. }));
    assert_eq!(store.count().unwrap(), 1);
    // No live attempt was made
    assert!(api.submitted().is_empty());
}

#[tokio::test]
async fn submit_delivers_live_when_available() {
    let api = Arc::new(MockApi::new());
    let (store, service) = make_service(&api);

    assert!(service.notify_online().await);
    let receipt = service.submit(make_payload("F-001")).await.unwrap();

    assert_eq!(receipt, SubmitReceipt::Delivered);
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(api.submitted_folios(), vec!["F-001"]);
}

#[tokio::test]
async fn failed_live_attempt_falls_back_to_queue() {
    let api = Arc::new(MockApi::new());
    api.set_default_outcome(SubmitOutcome::Retryable("timeout".to_string()));
    let (store, service) = make_service(&api);

    service.notify_online().await;
    let receipt = service.submit(make_payload("F-001")).await.unwrap();

    assert!(matches!(receipt, SubmitReceipt::Queued { .. }));
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(api.submitted_folios(), vec!["F-001"]);
}

#[tokio::test]
async fn rejected_live_attempt_is_queued_too() {
    let api = Arc::new(MockApi::new());
    api.set_default_outcome(SubmitOutcome::Rejected {
        status: 422,
        message: "missing field".to_string(),
    });
    let (store, service) = make_service(&api);

    service.notify_online().await;
    let receipt = service.submit(make_payload("F-001")).await.unwrap();

    assert!(matches!(receipt, SubmitReceipt::Queued { .. }));
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn live_duplicate_confirmation_counts_as_delivered() {
    let api = Arc::new(MockApi::new());
    api.set_default_outcome(SubmitOutcome::AlreadyAccepted);
    let (store, service) = make_service(&api);

    service.notify_online().await;
    let receipt = service.submit(make_payload("F-001")).await.unwrap();

    assert_eq!(receipt, SubmitReceipt::Delivered);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn queued_submissions_get_increasing_ids() {
    let api = Arc::new(MockApi::new());
    let (store, service) = make_service(&api);

    let first = service.submit(make_payload("F-001")).await.unwrap();
    let second = service.submit(make_payload("F-002")).await.unwrap();

    let (SubmitReceipt::Queued { id: a }, SubmitReceipt::Queued { id: b }) = (first, second)
    else {
        panic!("expected queued receipts");
    };
    assert!(b > a);

    let order: Vec<_> = store.list_pending().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![a, b]);
}

#[tokio::test]
async fn manual_sync_drains_even_when_believed_offline() {
    let api = Arc::new(MockApi::new());
    let (store, service) = make_service(&api);

    service.submit(make_payload("F-001")).await.unwrap();
    assert!(!service.status().unwrap().server_available);

    // The manual path attempts regardless of belief; the server answers
    let report = service.sync_now().await.unwrap().unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn status_reflects_the_pipeline() {
    let api = Arc::new(MockApi::new());
    let (_store, service) = make_service(&api);

    let status = service.status().unwrap();
    assert!(!status.server_available);
    assert!(!status.syncing);
    assert_eq!(status.pending, 0);
    assert!(status.last_sync_at.is_none());

    service.submit(make_payload("F-001")).await.unwrap();
    assert_eq!(service.status().unwrap().pending, 1);

    service.notify_online().await;
    service.sync_now().await.unwrap();

    let status = service.status().unwrap();
    assert!(status.server_available);
    assert!(!status.syncing);
    assert_eq!(status.pending, 0);
    assert!(status.last_sync_at.is_some());
}

#[tokio::test]
async fn status_serializes_for_ui_consumers() {
    let api = Arc::new(MockApi::new());
    let (_store, service) = make_service(&api);

    let status = service.status().unwrap();
    let json = serde_json::to_value(&status).unwrap();

    assert_eq!(json["server_available"], json!(false));
    assert_eq!(json["pending"], json!(0));
    assert_eq!(json["last_sync_at"], json!(null));
}

#[tokio::test]
async fn draft_roundtrip_through_service() {
    let api = Arc::new(MockApi::new());
    let (_store, service) = make_service(&api);

    assert!(service.load_draft().unwrap().is_none());

    service.save_draft(&json!({"folio": "F-001", "fecha": "2024-06-01"})).unwrap();
    let draft = service.load_draft().unwrap().unwrap();
    assert_eq!(draft["folio"], "F-001");

    service.clear_draft().unwrap();
    assert!(service.load_draft().unwrap().is_none());
}
