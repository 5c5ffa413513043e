// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for folio-core operations.

use thiserror::Error;

/// All possible errors that can occur in folio-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("invalid submission id: '{0}'\n  hint: expected a decimal millisecond timestamp")]
    InvalidSubmissionId(String),

    #[error("no state directory available for the submission store")]
    NoStateDir,
}

/// A specialized Result type for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
