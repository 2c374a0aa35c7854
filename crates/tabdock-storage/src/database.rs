//! Database connection and the queries the state store needs

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

/// One persisted Tabbable record. `node` is the encoded state document.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRow {
    pub name: String,
    pub node: String,
    pub updated_at: DateTime<Utc>,
}

impl StateRow {
    pub fn new(name: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Shared handle; clones use the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(path)?;
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        tracing::debug!(path = %path.display(), "Opened state database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // === Tabbable state ===

    /// Every stored record. Timestamps that cannot be read are replaced by
    /// the current time.
    pub fn state_rows(&self) -> Result<Vec<StateRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name, node, updated_at FROM tabbable_state")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(name, node, stamp)| {
                let updated_at = DateTime::parse_from_rfc3339(&stamp)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| {
                        tracing::warn!(name = %name, stamp = %stamp, "Unreadable state timestamp");
                        Utc::now()
                    });
                StateRow {
                    name,
                    node,
                    updated_at,
                }
            })
            .collect())
    }

    pub fn write_state(&self, row: &StateRow) -> Result<()> {
        let conn = self.conn.lock();
        insert_state(&conn, row)
    }

    /// Write all of `rows` or none of them.
    pub fn write_states(&self, rows: &[StateRow]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for row in rows {
            insert_state(&tx, row)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Returns whether a record was deleted.
    pub fn delete_state(&self, name: &str) -> Result<bool> {
        let deleted = self
            .conn
            .lock()
            .execute("DELETE FROM tabbable_state WHERE name = ?1", [name])?;
        Ok(deleted > 0)
    }

    // === Settings ===

    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .lock()
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

fn insert_state(conn: &Connection, row: &StateRow) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO tabbable_state (name, node, updated_at) VALUES (?1, ?2, ?3)",
        params![row.name, row.node, row.updated_at.to_rfc3339()],
    )?;
    Ok(())
}
