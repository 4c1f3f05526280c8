//! SQLite-backed key-value persistence.
//!
//! # Responsibility
//! - Store each slot as one row in `kv_slots`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Saves are single-statement upserts, so the latest write wins and a
//!   slot is never observed half-written.
//! - Connections must be migrated before use (`kv_slots` must exist).

use crate::db::{open_db, open_db_in_memory, require_table};
use crate::model::note::Note;
use crate::repo::persistence::{
    decode_slot, encode_slot, Persistence, PersistenceResult,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SLOTS_TABLE: &str = "kv_slots";

/// Slot storage inside a migrated SQLite database.
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> PersistenceResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `Db(MissingTable)` when migrations have not created `kv_slots`.
    pub fn try_new(conn: Connection) -> PersistenceResult<Self> {
        require_table(&conn, SLOTS_TABLE)?;
        Ok(Self { conn })
    }

    /// Reads raw slot text without decoding it.
    pub fn raw_slot(&self, key: &str) -> PersistenceResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// Writes raw slot text as-is.
    pub fn write_raw_slot(&self, key: &str, raw: &str) -> PersistenceResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, raw],
        )?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Persistence for SqlitePersistence {
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<Note>>> {
        self.raw_slot(key)?
            .map(|raw| decode_slot(&raw))
            .transpose()
    }

    fn save(&mut self, key: &str, notes: &[Note]) -> PersistenceResult<()> {
        let raw = encode_slot(notes)?;
        self.write_raw_slot(key, &raw)
    }
}
