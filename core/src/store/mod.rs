//! SQLite session archive.
//!
//! RULE: Only store/ talks to the database.
//! The rest of the core works on in-memory datasets and calls store
//! methods to archive or restore them. This is a local file (or an
//! in-memory database), never a shared server.

use crate::error::DashboardResult;
mod reflection;
mod session;
use rusqlite::Connection;

pub use reflection::Reflection;
pub use session::SessionInfo;

pub struct SessionStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl SessionStore {
    pub fn open(path: &str) -> DashboardResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashboardResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// The file backing this store, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DashboardResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_sessions.sql"))?;
        Ok(())
    }
}

/// Timestamps are stored as RFC 3339 text.
fn parse_timestamp(raw: &str) -> DashboardResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| anyhow::anyhow!("bad timestamp '{raw}' in session store: {e}").into())
}
