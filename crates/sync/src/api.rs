// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report API abstraction and HTTP implementation.
//!
//! [`ReportApi`] is the single seam to the remote endpoint, covering both
//! the submission POST and the lightweight health probe. The trait enables
//! mock implementations for unit testing; [`HttpApi`] is the production
//! implementation built on reqwest.
//!
//! The client is stateless between calls and never touches the queue —
//! deciding what to do with an outcome is the orchestrator's job.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SyncConfig;

/// Result of one outbound submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server stored the report.
    Accepted,
    /// The server had already stored a report with this folio.
    ///
    /// Counts as delivered: the replay reached a server that confirmed
    /// prior acceptance, so the item must be dequeued, not retried.
    AlreadyAccepted,
    /// Timeout, connection failure, or 5xx — worth retrying later.
    Retryable(String),
    /// The server rejected the payload outright (non-duplicate 4xx).
    ///
    /// The item still stays queued; silent data loss is worse than a
    /// stuck entry.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },
}

impl SubmitOutcome {
    /// True when the server holds the report, whether stored now or earlier.
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted | SubmitOutcome::AlreadyAccepted)
    }

    /// Classifies an HTTP response status.
    ///
    /// 409 is the duplicate-folio signal: the server refused to store a
    /// second report under the same folio, which confirms delivery.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            200..=299 => SubmitOutcome::Accepted,
            409 => SubmitOutcome::AlreadyAccepted,
            500..=599 => SubmitOutcome::Retryable(format!("HTTP {status}: {message}")),
            _ => SubmitOutcome::Rejected { status, message },
        }
    }
}

/// Supplies the bearer credential attached to submissions.
///
/// Authentication itself is an external collaborator; the sync engine only
/// needs the current token, if one exists.
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, or `None` when unauthenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed bearer token.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wraps a token string.
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken { token: token.into() }
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Trait for the remote report endpoint.
///
/// This abstracts over the actual HTTP stack, allowing for easy testing
/// with mock implementations.
pub trait ReportApi: Send + Sync {
    /// Performs one outbound submission attempt.
    ///
    /// Never fails with an error: every failure mode is folded into the
    /// [`SubmitOutcome`] taxonomy.
    fn submit<'a>(
        &'a self,
        payload: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = SubmitOutcome> + Send + 'a>>;

    /// Probes the health endpoint.
    ///
    /// Returns whether the endpoint answered with a success status within
    /// the probe timeout. Timeouts and network errors map to `false`.
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Joins a base URL and a path, tolerating a trailing slash on the base.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// HTTP implementation of [`ReportApi`] using reqwest.
pub struct HttpApi {
    client: reqwest::Client,
    submit_url: String,
    health_url: String,
    submit_timeout: Duration,
    probe_timeout: Duration,
    token: Arc<dyn TokenProvider>,
}

impl HttpApi {
    /// Creates an HTTP API client from the sync configuration.
    pub fn new(config: &SyncConfig, token: Arc<dyn TokenProvider>) -> Self {
        HttpApi {
            client: reqwest::Client::new(),
            submit_url: join_url(&config.base_url, "reports/generate"),
            health_url: join_url(&config.base_url, "health"),
            submit_timeout: Duration::from_millis(config.submit_timeout_ms),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            token,
        }
    }

    #[cfg(test)]
    pub(crate) fn endpoints(&self) -> (&str, &str) {
        (&self.submit_url, &self.health_url)
    }
}

impl ReportApi for HttpApi {
    fn submit<'a>(
        &'a self,
        payload: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = SubmitOutcome> + Send + 'a>> {
        Box::pin(async move {
            let mut request = self
                .client
                .post(&self.submit_url)
                .timeout(self.submit_timeout)
                .json(payload);

            if let Some(token) = self.token.bearer_token() {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let message = if response.status().is_success() {
                        String::new()
                    } else {
                        response.text().await.unwrap_or_default()
                    };
                    SubmitOutcome::from_status(status, message)
                }
                Err(e) if e.is_timeout() => {
                    SubmitOutcome::Retryable("request timed out".to_string())
                }
                Err(e) => SubmitOutcome::Retryable(e.to_string()),
            }
        })
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            match self.client.get(&self.health_url).timeout(self.probe_timeout).send().await {
                Ok(response) => response.status().is_success(),
                Err(_) => false,
            }
        })
    }
}
