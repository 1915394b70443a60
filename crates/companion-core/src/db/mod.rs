//! Direct SQLite database access.
//!
//! One `Database` is opened by the composition root and shared (via `Arc`) by
//! the history store and the reminder preference store. Tables are created on
//! open.

pub mod migrations;
pub mod types;

pub use types::*;

use crate::error::{Error, Result};
use crate::utils::now_millis;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Database connection wrapper.
///
/// Thread-safe via internal Mutex. All database operations acquire the lock.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at a specific path
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(Error::Database)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        debug!(path = %path.display(), "Opened database");

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Database)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Counter that changes whenever another connection commits to the file
    pub fn data_version(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        Ok(conn.query_row("PRAGMA data_version", [], |row| row.get(0))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an interaction and return the stored record
    pub fn insert_interaction(&self, input: &NewInteraction) -> Result<InteractionRecord> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let created_at = input.created_at.unwrap_or_else(now_millis);

        conn.execute(
            "INSERT INTO interactions (question, answer, timestamp) VALUES (?1, ?2, ?3)",
            params![input.question, input.answer, created_at],
        )?;

        Ok(InteractionRecord {
            id: conn.last_insert_rowid(),
            question: input.question.clone(),
            answer: input.answer.clone(),
            created_at,
        })
    }

    /// List all interactions, newest first
    pub fn list_interactions(&self) -> Result<Vec<InteractionRecord>> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, question, answer, timestamp
             FROM interactions
             ORDER BY timestamp DESC, id DESC",
        )?;
        let records = stmt
            .query_map([], Self::map_interaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete an interaction. Returns false if it did not exist.
    pub fn delete_interaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let rows = conn.execute("DELETE FROM interactions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Delete every interaction. Returns the number removed.
    pub fn clear_interactions(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let rows = conn.execute("DELETE FROM interactions", [])?;
        Ok(rows)
    }

    fn map_interaction(row: &rusqlite::Row) -> rusqlite::Result<InteractionRecord> {
        Ok(InteractionRecord {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preference Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a boolean preference. None if never written.
    pub fn get_preference(&self, namespace: &str, key: &str) -> Result<Option<bool>> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        Ok(conn
            .query_row(
                "SELECT enabled FROM preferences WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get::<_, bool>(0),
            )
            .optional()?)
    }

    /// Write a boolean preference (last write wins)
    pub fn set_preference(&self, namespace: &str, key: &str, enabled: bool) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        conn.execute(
            "INSERT INTO preferences (namespace, key, enabled, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key) DO UPDATE SET
                enabled = excluded.enabled,
                updated_at = excluded.updated_at",
            params![namespace, key, enabled, now_millis()],
        )?;
        Ok(())
    }
}
