//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record kept by `NoteStore`.
//! - Provide construction helpers for full notes and item stubs.
//! - Parse comma-separated tag input.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `text == None` marks a minimal item stub (`{id,title,date}` shape).
//! - Stubs carry empty `category`, empty `tags` and `important == false`.

use crate::model::record::NoteRecord;
use serde::{Deserialize, Serialize};

/// Stable note identifier: epoch milliseconds at creation time.
pub type NoteId = i64;

/// Canonical note record.
///
/// Serialized through [`NoteRecord`] so both historical shapes keep their
/// exact wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NoteRecord", into = "NoteRecord")]
pub struct Note {
    /// Creation timestamp id, unique within one collection.
    pub id: NoteId,
    /// Trimmed, non-empty title for notes created through the store.
    pub title: String,
    /// Note body. `None` for item stubs.
    pub text: Option<String>,
    /// Free-form category, may be empty.
    pub category: String,
    /// Ordered tag tokens; empty tokens are kept as entered.
    pub tags: Vec<String>,
    /// Human-readable timestamp of creation or last content edit.
    pub date: String,
    /// Importance marker. Always `false` for item stubs.
    pub important: bool,
}

impl Note {
    /// Creates a full note with `important = false`.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            text: Some(text.into()),
            category: category.into(),
            tags,
            date: date.into(),
            important: false,
        }
    }

    /// Creates a minimal item stub carrying only title and date.
    pub fn item(id: NoteId, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: None,
            category: String::new(),
            tags: Vec::new(),
            date: date.into(),
            important: false,
        }
    }

    /// Returns whether this record is a minimal item stub.
    pub fn is_item(&self) -> bool {
        self.text.is_none()
    }

    /// Case-insensitive containment check over title and text.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self
                .text
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
    }
}

/// Splits comma-separated tag input into trimmed tokens.
///
/// Empty tokens survive: `"a,,b"` yields `["a", "", "b"]` and blank input
/// yields `[""]`.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .trim()
        .split(',')
        .map(|tag| tag.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_tags, Note};

    #[test]
    fn parse_tags_trims_tokens_and_keeps_empty_ones() {
        assert_eq!(parse_tags(" food , urgent "), vec!["food", "urgent"]);
        assert_eq!(parse_tags("a,,b,"), vec!["a", "", "b", ""]);
        assert_eq!(parse_tags("   "), vec![""]);
    }

    #[test]
    fn matches_lowercase_checks_title_and_text() {
        let note = Note::new(1, "Groceries", "Milk and EGGS", "", Vec::new(), "");
        assert!(note.matches_lowercase("groc"));
        assert!(note.matches_lowercase("eggs"));
        assert!(!note.matches_lowercase("bread"));
        assert!(note.matches_lowercase(""));
    }

    #[test]
    fn item_stub_matches_title_only() {
        let item = Note::item(2, "Legacy item", "1/1/2024");
        assert!(item.is_item());
        assert!(item.matches_lowercase("legacy"));
        assert!(!item.matches_lowercase("body"));
    }
}
