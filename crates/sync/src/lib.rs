// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! folio-sync: Offline-first submission sync for field-service reports.
//!
//! A submission is first attempted live against the report API. On failure
//! it is durably enqueued, and the queue is replayed whenever the endpoint
//! becomes reachable again, leaning on the server's folio-based idempotency
//! check so at-least-once replay never creates a second report.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ triggers ┌──────────────────┐ replays ┌────────────┐
//! │ Connectivity │─────────►│ SyncOrchestrator │────────►│  ReportApi │
//! │   Monitor    │          │  (drain passes)  │◄────────│   (trait)  │
//! └──────────────┘          └──────────────────┘         └────────────┘
//!        │                           │
//!        │ probes                    ▼ removes on confirmed acceptance
//!        ▼                  ┌──────────────────┐
//! ┌──────────────┐          │      Store       │  (SQLite queue + drafts)
//! │  /health     │          └──────────────────┘
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - Durable SQLite submission queue, oldest-first replay
//! - Connectivity belief from periodic + reactive health probes
//! - At-most-one drain pass in flight, per-item failure isolation
//! - Duplicate-folio confirmations treated as delivered
//! - Injectable [`api::ReportApi`] for testing without a server
//! - [`service::SyncService`] facade wiring the pieces together

pub mod api;
pub mod config;
pub mod monitor;
pub mod orchestrator;
pub mod service;
pub mod status;

pub use api::{HttpApi, ReportApi, StaticToken, SubmitOutcome, TokenProvider};
pub use config::SyncConfig;
pub use monitor::ConnectivityMonitor;
pub use orchestrator::{DrainReport, SyncOrchestrator};
pub use service::{SubmitReceipt, SyncService};
pub use status::SyncStatus;

#[cfg(test)]
mod test_helpers;




#[cfg(test)]
mod monitor_tests;


#[cfg(test)]
mod service_tests;
