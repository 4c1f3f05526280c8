//! Persistence contract for the note collection.
//!
//! # Responsibility
//! - Define the load/save boundary `NoteStore` writes through.
//! - Share the JSON slot codec between backends.
//!
//! # Invariants
//! - `save` stores the full ordered collection; `load` returns it unchanged.
//! - An absent slot is `Ok(None)`, an unreadable slot is `Err(Decode)`.

use crate::db::DbError;
use crate::model::note::Note;
use crate::model::record::{decode_collection, encode_collection, DecodeError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage failure raised by a persistence backend.
#[derive(Debug)]
pub enum PersistenceError {
    /// SQLite transport or schema failure.
    Db(DbError),
    /// Collection could not be encoded for storage.
    Encode(serde_json::Error),
    /// Stored slot content is not a readable collection.
    Decode(DecodeError),
    /// Backend refuses reads/writes (quota, closed storage, ...).
    Unavailable(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode note collection: {err}"),
            Self::Decode(err) => write!(f, "stored note collection is unreadable: {err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable slot storage for the ordered note collection.
pub trait Persistence {
    /// Reads the collection stored under `key`.
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<Note>>>;
    /// Replaces the collection stored under `key`.
    fn save(&mut self, key: &str, notes: &[Note]) -> PersistenceResult<()>;
}

/// Encodes a collection into slot text.
pub fn encode_slot(notes: &[Note]) -> PersistenceResult<String> {
    encode_collection(notes).map_err(PersistenceError::Encode)
}

/// Decodes slot text into a collection.
pub fn decode_slot(raw: &str) -> PersistenceResult<Vec<Note>> {
    decode_collection(raw)
        .map(|decoded| decoded.notes)
        .map_err(PersistenceError::Decode)
}
