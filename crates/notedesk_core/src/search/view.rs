//! Case-insensitive substring search view.

use crate::model::note::{Note, NoteId};
use std::slice;

/// Lazy filtered view of notes whose title or text contains a query.
///
/// The view is restartable: every call to [`NoteSearch::iter`] walks the
/// borrowed collection again from the start.
#[derive(Debug, Clone)]
pub struct NoteSearch<'a> {
    notes: &'a [Note],
    needle: String,
}

impl<'a> NoteSearch<'a> {
    /// Builds a view; an empty query matches every note.
    pub fn new(notes: &'a [Note], query: &str) -> Self {
        Self {
            notes,
            needle: query.to_lowercase(),
        }
    }

    /// Lowercased query text used for matching.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Starts a fresh pass over matching notes in collection order.
    pub fn iter(&self) -> NoteSearchIter<'_, 'a> {
        NoteSearchIter {
            inner: self.notes.iter(),
            needle: &self.needle,
        }
    }

    /// Ids of matching notes in collection order.
    pub fn ids(&self) -> Vec<NoteId> {
        self.iter().map(|note| note.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'s, 'a> IntoIterator for &'s NoteSearch<'a> {
    type Item = &'a Note;
    type IntoIter = NoteSearchIter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`NoteSearch::iter`].
#[derive(Debug, Clone)]
pub struct NoteSearchIter<'s, 'a> {
    inner: slice::Iter<'a, Note>,
    needle: &'s str,
}

impl<'a> Iterator for NoteSearchIter<'_, 'a> {
    type Item = &'a Note;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle;
        self.inner.find(|note| note.matches_lowercase(needle))
    }
}
