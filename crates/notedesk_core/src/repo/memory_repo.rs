//! In-memory key-value persistence.
//!
//! Keeps slot text in a map, mirroring browser-style local storage. Used by
//! tests and by hosts that do not need durability.

use crate::model::note::Note;
use crate::repo::persistence::{
    decode_slot, encode_slot, Persistence, PersistenceError, PersistenceResult,
};
use std::collections::HashMap;

/// Map-backed slot storage with a switch to simulate storage failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slots: HashMap<String, String>,
    unavailable: Option<String>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one slot with raw text, e.g. a corrupted or legacy payload.
    pub fn with_raw_slot(mut self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.slots.insert(key.into(), raw.into());
        self
    }

    /// Returns raw slot text as last written.
    pub fn raw_slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// Makes every following read and write fail with `reason`.
    pub fn set_unavailable(&mut self, reason: impl Into<String>) {
        self.unavailable = Some(reason.into());
    }

    pub fn set_available(&mut self) {
        self.unavailable = None;
    }

    fn ensure_available(&self) -> PersistenceResult<()> {
        match &self.unavailable {
            Some(reason) => Err(PersistenceError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<Note>>> {
        self.ensure_available()?;
        self.slots.get(key).map(|raw| decode_slot(raw)).transpose()
    }

    fn save(&mut self, key: &str, notes: &[Note]) -> PersistenceResult<()> {
        self.ensure_available()?;
        let raw = encode_slot(notes)?;
        self.slots.insert(key.to_string(), raw);
        Ok(())
    }
}
