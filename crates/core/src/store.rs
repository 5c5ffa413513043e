// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for submissions and form drafts.
//!
//! The [`Store`] is the sole durable owner of pending-submission records.
//! It survives process restarts and holds only unsynced work: a record is
//! deleted (not flagged) once the server confirms acceptance. The store
//! also keeps the last-saved form draft per logical name so a partly
//! filled form is not lost on restart.
//!
//! All operations are synchronous and touch nothing but the database file;
//! network access never happens here.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::submission::{PendingSubmission, SubmissionId};

/// SQL schema for the submission store.
pub const SCHEMA: &str = r#"
-- Not-yet-acknowledged form submissions, oldest first by id
CREATE TABLE IF NOT EXISTS pending_submissions (
    id INTEGER PRIMARY KEY,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL,
    synced_at TEXT
);

-- Last-saved form drafts, keyed by logical name
CREATE TABLE IF NOT EXISTS drafts (
    name TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    saved_at TEXT NOT NULL
);
"#;

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse a JSON payload column.
fn parse_payload(value: &str) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    serde_json::from_str(value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData("invalid JSON in column 'payload'".to_string())),
        )
    })
}

/// Durable key-value store for pending submissions and drafts.
///
/// The connection sits behind a mutex so one `Store` can be shared across
/// the monitor and orchestrator tasks via `Arc`.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL mode so a reader snapshot never blocks the enqueue path
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn: Mutex::new(conn) })
    }

    /// Opens an in-memory store. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn: Mutex::new(conn) })
    }

    /// Default store location under the XDG state directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
            .ok_or(Error::NoStateDir)?;
        Ok(base.join("folio").join("submissions.db"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts a pending submission.
    ///
    /// Storage errors propagate to the caller; a failed enqueue must be
    /// surfaced, never reported as success.
    pub fn enqueue(&self, submission: &PendingSubmission) -> Result<()> {
        let payload = serde_json::to_string(&submission.payload)?;
        self.lock().execute(
            "INSERT INTO pending_submissions (id, payload, created_at, synced_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                submission.id.as_millis() as i64,
                payload,
                submission.created_at.to_rfc3339(),
                submission.synced_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Returns a fresh snapshot of all pending submissions, oldest first.
    pub fn list_pending(&self) -> Result<Vec<PendingSubmission>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, payload, created_at, synced_at
             FROM pending_submissions
             WHERE synced_at IS NULL
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let id = id as u64;
            let payload: String = row.get(1)?;
            let created_at: String = row.get(2)?;
            let synced_at: Option<String> = row.get(3)?;

            Ok(PendingSubmission {
                id: SubmissionId::new(id),
                payload: parse_payload(&payload)?,
                created_at: parse_timestamp(&created_at, "created_at")?,
                synced_at: synced_at
                    .as_deref()
                    .map(|s| parse_timestamp(s, "synced_at"))
                    .transpose()?,
            })
        })?;

        let mut pending = Vec::new();
        for row in rows {
            pending.push(row?);
        }
        Ok(pending)
    }

    /// Deletes a submission. Removing an already-removed ID is a no-op.
    pub fn remove(&self, id: SubmissionId) -> Result<()> {
        self.lock()
            .execute("DELETE FROM pending_submissions WHERE id = ?1", params![id.as_millis() as i64])?;
        Ok(())
    }

    /// Number of currently pending submissions.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.lock().query_row(
            "SELECT COUNT(*) FROM pending_submissions WHERE synced_at IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Saves (or replaces) the draft stored under the given name.
    pub fn save_draft(&self, name: &str, payload: &serde_json::Value) -> Result<()> {
        let payload = serde_json::to_string(payload)?;
        self.lock().execute(
            "INSERT INTO drafts (name, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET payload = ?2, saved_at = ?3",
            params![name, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Loads the draft stored under the given name, if any.
    pub fn load_draft(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let payload: Option<String> = self
            .lock()
            .query_row("SELECT payload FROM drafts WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;

        match payload {
            None => Ok(None),
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
        }
    }

    /// Deletes the draft stored under the given name. Idempotent.
    pub fn clear_draft(&self, name: &str) -> Result<()> {
        self.lock().execute("DELETE FROM drafts WHERE name = ?1", params![name])?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
