//! Database migrations
//!
//! SQL migrations are embedded as strings and executed when the database is opened.

use rusqlite::Connection;

use crate::error::Result;

/// Companion tables SQL (001)
pub const COMPANION_TABLES_SQL: &str = include_str!("001_companion_tables.sql");

/// Run all migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(COMPANION_TABLES_SQL)?;
    Ok(())
}
