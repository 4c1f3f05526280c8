//! Note collection use-case service.
//!
//! # Responsibility
//! - Own the ordered in-memory note collection.
//! - Provide create/update/delete/toggle, search, sort, reorder and
//!   export/import entry points for the presentation layer.
//! - Mirror the collection to `Persistence` after every effective mutation.
//!
//! # Invariants
//! - Note ids are unique within the collection.
//! - Notes accepted through `add`/`update` have non-empty trimmed title/text.
//! - Validation rejections and unknown ids are `Ok(None)`/`Ok(false)`, never
//!   errors, and never trigger a save.
//! - A failed save keeps the in-memory change and reports
//!   `StoreError::Persistence`.
//! - A malformed import leaves the collection untouched.

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::model::date::format_note_date;
use crate::model::note::{parse_tags, Note, NoteId};
use crate::model::record::{decode_collection, encode_collection, DecodeError};
use crate::repo::persistence::{Persistence, PersistenceError};
use crate::search::view::NoteSearch;
use crate::service::ordering::{
    reorder_by_ids, sort_by_date_desc, sort_by_important, sort_by_title, SortOrder,
};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by `NoteStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Saving or loading through the persistence backend failed.
    Persistence(PersistenceError),
    /// Import payload is not a JSON array of record objects.
    ImportMalformed(DecodeError),
    /// Collection could not be serialized for export.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "changes may not be saved: {err}"),
            Self::ImportMalformed(err) => write!(f, "import failed: {err}"),
            Self::Serialize(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::ImportMalformed(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Ordered note collection mirrored to a persistence backend.
pub struct NoteStore<P: Persistence, C: Clock = SystemClock> {
    notes: Vec<Note>,
    persistence: P,
    clock: C,
    config: StoreConfig,
}

impl<P: Persistence, C: Clock> NoteStore<P, C> {
    /// Loads the collection stored under the default `notes` key.
    pub fn load(persistence: P, clock: C) -> StoreResult<Self> {
        Self::load_with_config(persistence, clock, StoreConfig::default())
    }

    /// Loads the collection stored under `config.storage_key()`.
    ///
    /// An absent or unreadable slot yields an empty collection.
    ///
    /// # Errors
    /// - `Persistence` when the backend itself cannot be read.
    pub fn load_with_config(persistence: P, clock: C, config: StoreConfig) -> StoreResult<Self> {
        let started_at = Instant::now();
        let key = config.storage_key();
        let notes = match persistence.load(key) {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(PersistenceError::Decode(err)) => {
                warn!(
                    "event=store_load module=store status=degraded key={} error_code=slot_unreadable error={}",
                    key, err
                );
                Vec::new()
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error key={} error_code=load_failed error={}",
                    key, err
                );
                return Err(err.into());
            }
        };

        info!(
            "event=store_load module=store status=ok key={} count={} duration_ms={}",
            key,
            notes.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            notes,
            persistence,
            clock,
            config,
        })
    }

    /// Notes in current collection order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        self.config.storage_key()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Backend access for fault-injection in tests.
    #[doc(hidden)]
    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    /// Appends a new full note.
    ///
    /// Returns `Ok(None)` without any change when trimmed title or text is
    /// empty.
    pub fn add(
        &mut self,
        title: &str,
        text: &str,
        category: &str,
        tags_input: &str,
    ) -> StoreResult<Option<Note>> {
        let (title, text) = (title.trim(), text.trim());
        if title.is_empty() || text.is_empty() {
            debug!("event=note_add module=store status=rejected reason=blank_input");
            return Ok(None);
        }

        let note = Note::new(
            self.next_id(),
            title,
            text,
            category.trim(),
            parse_tags(tags_input),
            self.current_date(),
        );
        self.notes.push(note.clone());
        self.persist("note_add")?;

        info!(
            "event=note_add module=store status=ok id={} tags={} count={}",
            note.id,
            note.tags.len(),
            self.notes.len()
        );
        Ok(Some(note))
    }

    /// Replaces title and text of one note and refreshes its date.
    ///
    /// Item stubs only take the new title. Returns `Ok(false)` when the id is
    /// unknown or either trimmed input is empty.
    pub fn update(&mut self, id: NoteId, title: &str, text: &str) -> StoreResult<bool> {
        let (title, text) = (title.trim(), text.trim());
        if title.is_empty() || text.is_empty() {
            debug!("event=note_update module=store status=rejected id={id} reason=blank_input");
            return Ok(false);
        }

        let date = self.current_date();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            debug!("event=note_update module=store status=skipped id={id} reason=not_found");
            return Ok(false);
        };
        note.title = title.to_string();
        if let Some(body) = note.text.as_mut() {
            *body = text.to_string();
        }
        note.date = date;

        self.persist("note_update")?;
        info!("event=note_update module=store status=ok id={id}");
        Ok(true)
    }

    /// Removes one note. Returns `Ok(false)` when the id is unknown.
    pub fn delete(&mut self, id: NoteId) -> StoreResult<bool> {
        let Some(index) = self.notes.iter().position(|note| note.id == id) else {
            debug!("event=note_delete module=store status=skipped id={id} reason=not_found");
            return Ok(false);
        };
        self.notes.remove(index);

        self.persist("note_delete")?;
        info!(
            "event=note_delete module=store status=ok id={id} count={}",
            self.notes.len()
        );
        Ok(true)
    }

    /// Flips the importance flag of a full note; `date` is left as is.
    ///
    /// Returns `Ok(false)` for unknown ids and item stubs.
    pub fn toggle_important(&mut self, id: NoteId) -> StoreResult<bool> {
        let Some(note) = self
            .notes
            .iter_mut()
            .find(|note| note.id == id && !note.is_item())
        else {
            debug!("event=note_toggle_important module=store status=skipped id={id}");
            return Ok(false);
        };
        note.important = !note.important;
        let important = note.important;

        self.persist("note_toggle_important")?;
        info!("event=note_toggle_important module=store status=ok id={id} important={important}");
        Ok(true)
    }

    /// Filtered, order-preserving view over title and text.
    pub fn search(&self, query: &str) -> NoteSearch<'_> {
        NoteSearch::new(&self.notes, query)
    }

    /// Most recent first; unparsable dates keep their positions.
    pub fn sort_by_date(&mut self) -> StoreResult<()> {
        self.sort(SortOrder::DateDesc)
    }

    /// Title ascending, locale-style.
    pub fn sort_by_title(&mut self) -> StoreResult<()> {
        self.sort(SortOrder::TitleAsc)
    }

    /// Important notes first.
    pub fn sort_by_important(&mut self) -> StoreResult<()> {
        self.sort(SortOrder::ImportantFirst)
    }

    /// Reorders the collection with a stable sort and persists the order.
    pub fn sort(&mut self, order: SortOrder) -> StoreResult<()> {
        match order {
            SortOrder::DateDesc => sort_by_date_desc(&mut self.notes),
            SortOrder::TitleAsc => sort_by_title(&mut self.notes),
            SortOrder::ImportantFirst => sort_by_important(&mut self.notes),
        }

        self.persist("note_sort")?;
        info!(
            "event=note_sort module=store status=ok order={} count={}",
            order.label(),
            self.notes.len()
        );
        Ok(())
    }

    /// Applies a manual order captured by the presentation layer.
    ///
    /// Unknown ids are dropped; notes not named keep their relative order
    /// after the named ones.
    pub fn reorder(&mut self, ids: &[NoteId]) -> StoreResult<()> {
        let ignored = reorder_by_ids(&mut self.notes, ids);

        self.persist("note_reorder")?;
        info!(
            "event=note_reorder module=store status=ok requested={} ignored={}",
            ids.len(),
            ignored
        );
        Ok(())
    }

    /// Serializes the whole collection, in order, as a JSON array.
    pub fn export_all(&self) -> StoreResult<String> {
        let payload = encode_collection(&self.notes).map_err(StoreError::Serialize)?;
        info!(
            "event=note_export module=store status=ok count={} bytes={}",
            self.notes.len(),
            payload.len()
        );
        Ok(payload)
    }

    /// Replaces the collection with the records in `payload`.
    ///
    /// Returns the number of imported notes.
    ///
    /// # Errors
    /// - `ImportMalformed` when `payload` is not a JSON array of objects; the
    ///   collection is not changed.
    /// - `Persistence` when the replaced collection cannot be saved.
    pub fn import_all(&mut self, payload: &str) -> StoreResult<usize> {
        let decoded = decode_collection(payload).map_err(|err| {
            warn!(
                "event=note_import module=store status=error error_code=import_malformed error={}",
                err
            );
            StoreError::ImportMalformed(err)
        })?;

        if decoded.skipped > 0 || decoded.duplicates > 0 {
            warn!(
                "event=note_import module=store status=partial skipped={} duplicates={}",
                decoded.skipped, decoded.duplicates
            );
        }

        self.notes = decoded.notes;
        self.persist("note_import")?;
        info!(
            "event=note_import module=store status=ok count={}",
            self.notes.len()
        );
        Ok(self.notes.len())
    }

    fn next_id(&self) -> NoteId {
        let now = self.clock.now_millis();
        match self.notes.iter().map(|note| note.id).max() {
            Some(max_id) if max_id >= now => max_id.checked_add(1).unwrap_or_else(|| {
                warn!("event=note_add module=store status=fallback reason=id_overflow");
                self.lowest_free_id()
            }),
            _ => now,
        }
    }

    /// Smallest non-negative id not used by any note.
    fn lowest_free_id(&self) -> NoteId {
        let mut used: Vec<NoteId> = self
            .notes
            .iter()
            .map(|note| note.id)
            .filter(|id| *id >= 0)
            .collect();
        used.sort_unstable();
        used.dedup();

        let mut candidate = 0;
        for id in used {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }

    fn current_date(&self) -> String {
        format_note_date(self.clock.now_local())
    }

    fn persist(&mut self, event: &'static str) -> StoreResult<()> {
        let key = self.config.storage_key();
        self.persistence.save(key, &self.notes).map_err(|err| {
            error!(
                "event={} module=store status=error error_code=persist_failed key={} error={}",
                event, key, err
            );
            StoreError::Persistence(err)
        })
    }
}
