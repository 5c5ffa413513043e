// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the sync crate.

use folio_core::{PendingSubmission, SubmissionId};
use serde_json::json;

/// Builds a form payload carrying the given folio.
pub fn make_payload(folio: &str) -> serde_json::Value {
    json!({
        "folio": folio,
        "tipoServicio": "preventivo",
        "ubicacion": "Subestación Norte",
        "materiales": [{"nombre": "conector", "cantidad": 2}],
    })
}

/// Builds a pending submission whose folio is derived from the timestamp.
pub fn make_submission(ms: u64) -> PendingSubmission {
    PendingSubmission::new(SubmissionId::new(ms), make_payload(&format!("F-{ms}")))
}

/// Lets spawned tasks run to completion on the current-thread runtime.
pub async fn settle() {
    for _ in 0..25 {
        tokio::task::yield_now().await;
    }
}
