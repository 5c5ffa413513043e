// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync configuration.
//!
//! Loaded from a TOML file or built in code. Every tunable has a default,
//! so a config file only needs to name the API base URL.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the report API (e.g. `http://localhost:3000/api`).
    pub base_url: String,
    /// Seconds between periodic connectivity probes (default: 30).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Health-probe timeout in milliseconds (default: 3000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Submission-attempt timeout in milliseconds (default: 10000).
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
    /// Logical name the form draft is stored under (default: "form-draft").
    #[serde(default = "default_draft_name")]
    pub draft_name: String,
}

fn default_probe_interval_secs() -> u64 {
    30
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

fn default_submit_timeout_ms() -> u64 {
    10_000
}

fn default_draft_name() -> String {
    "form-draft".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            base_url: "http://localhost:3000/api".to_string(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            submit_timeout_ms: default_submit_timeout_ms(),
            draft_name: default_draft_name(),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
