//! SQLite-based override storage

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rusqlite_migration::{M, Migrations};

use super::traits::OverrideStore;
use crate::models::{FlagPatch, MessageId, Override};

/// Database migrations
///
/// Each migration is applied in order. The user_version pragma tracks which
/// migrations have been applied.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // Migration 1: Initial schema
        M::up(
            r#"
            -- One row per message the user has edited.
            -- NULL means the field was never set and the fetched value wins.
            CREATE TABLE overrides (
                id TEXT PRIMARY KEY,
                is_read INTEGER,
                is_favorite INTEGER,
                updated_at TEXT NOT NULL
            );
            "#,
        ),
    ])
}

/// SQLite-based override storage
///
/// Every merge is a single upsert statement, so a write is either fully
/// applied or not applied at all.
pub struct SqliteOverrideStore {
    conn: Mutex<Connection>,
}

impl SqliteOverrideStore {
    /// Open (or create) the override database at `db_path`
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {:?}", db_path))?;

        // WAL keeps readers unblocked during writes; NORMAL sync is safe with WAL.
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;

        let store = Self::from_connection(conn)?;
        info!("Opened override store at {}", db_path.display());
        Ok(store)
    }

    /// Open a private in-memory database (for tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migrations()
            .to_latest(&mut conn)
            .context("Failed to run database migrations")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("override database lock poisoned"))
    }
}

/// Map a row of (id, is_read, is_favorite, updated_at) to an Override
fn override_from_row(row: &Row<'_>) -> rusqlite::Result<Override> {
    let updated_at_str: String = row.get(3)?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH);

    Ok(Override {
        id: MessageId::new(row.get::<_, String>(0)?),
        read: row.get(1)?,
        favorite: row.get(2)?,
        updated_at,
    })
}

impl OverrideStore for SqliteOverrideStore {
    fn get(&self, id: &MessageId) -> Result<Option<Override>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, is_read, is_favorite, updated_at FROM overrides WHERE id = ?",
                [id.as_str()],
                override_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn get_all(&self) -> Result<HashMap<MessageId, Override>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, is_read, is_favorite, updated_at FROM overrides")?;

        let overrides = stmt
            .query_map([], override_from_row)?
            .map(|row| row.map(|o| (o.id.clone(), o)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(overrides)
    }

    fn merge(&self, id: &MessageId, patch: FlagPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO overrides (id, is_read, is_favorite, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                is_read = COALESCE(excluded.is_read, overrides.is_read),
                is_favorite = COALESCE(excluded.is_favorite, overrides.is_favorite),
                updated_at = excluded.updated_at",
            params![
                id.as_str(),
                patch.read,
                patch.favorite,
                Utc::now().to_rfc3339()
            ],
        )
        .with_context(|| format!("Failed to write override for message {}", id))?;

        debug!("Merged override for {}: {:?}", id, patch);
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM overrides", [])?;
        info!("Removed {} overrides", removed);
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM overrides", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
