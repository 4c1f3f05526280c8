//! SQLite storage bootstrap for the key-value slot table.
//!
//! # Responsibility
//! - Open migrated connections (`open_db`, `open_db_in_memory`).
//! - Check that a connection carries the tables the slot store reads.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A failed migration step rolls back every step of the same open.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::Connection;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or inspecting the slot database.
#[derive(Debug)]
pub enum DbError {
    /// Connection, pragma or query failure outside a migration step.
    Sqlite(rusqlite::Error),
    /// File was migrated by a newer build than this one.
    SchemaTooNew { found: u32, supported: u32 },
    /// One migration step failed; nothing from this open was applied.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// Connection lacks a table the slot store depends on.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "slot database schema v{found} was written by a newer build (this build supports up to v{supported})"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration v{version} `{name}` failed: {source}"),
            Self::MissingTable(table) => {
                write!(f, "slot database is missing table `{table}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Fails with `MissingTable` unless `table` exists on `conn`.
pub fn require_table(conn: &Connection, table: &'static str) -> DbResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DbError::MissingTable(table))
    }
}
