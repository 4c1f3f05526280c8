//! Collection ordering rules.
//!
//! # Invariants
//! - Every function returns a permutation of its input.
//! - Sorts are stable: equal keys keep their relative order.
//! - Comparators are total orders.

use crate::model::date::parse_note_date;
use crate::model::note::{Note, NoteId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

/// Programmatic sort modes offered to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent `date` first.
    DateDesc,
    /// Title ascending, locale-style.
    TitleAsc,
    /// Important notes first.
    ImportantFirst,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "date",
            Self::TitleAsc => "title",
            Self::ImportantFirst => "important",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::DateDesc),
            "title" => Ok(Self::TitleAsc),
            "important" => Ok(Self::ImportantFirst),
            other => Err(format!(
                "unsupported sort order `{other}`; expected date|title|important"
            )),
        }
    }
}

/// Sorts notes by parsed date, most recent first.
///
/// Notes with an unparsable date stay at their exact index; notes with a
/// parsable date are sorted among themselves into the remaining slots.
pub fn sort_by_date_desc(notes: &mut Vec<Note>) {
    let mut dated: Vec<(usize, _)> = notes
        .iter()
        .enumerate()
        .filter_map(|(index, note)| parse_note_date(&note.date).map(|at| (index, at)))
        .collect();
    if dated.len() < 2 {
        return;
    }

    let mut is_dated_slot = vec![false; notes.len()];
    for (index, _) in &dated {
        is_dated_slot[*index] = true;
    }
    dated.sort_by(|left, right| right.1.cmp(&left.1));

    let mut sources = dated.into_iter().map(|(index, _)| index);
    let mut taken: Vec<Option<Note>> = std::mem::take(notes).into_iter().map(Some).collect();
    for slot in 0..taken.len() {
        let source = if is_dated_slot[slot] {
            sources.next()
        } else {
            Some(slot)
        };
        if let Some(note) = source.and_then(|index| taken[index].take()) {
            notes.push(note);
        }
    }
}

/// Sorts notes by title, ascending.
pub fn sort_by_title(notes: &mut [Note]) {
    notes.sort_by(|left, right| compare_titles(&left.title, &right.title));
}

/// Moves important notes ahead of the rest.
pub fn sort_by_important(notes: &mut [Note]) {
    notes.sort_by_key(|note| !note.important);
}

/// Locale-style title comparison.
///
/// Case-folded text decides first, then lowercase sorts before uppercase at
/// the first differing position, then raw code points.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| {
            left.chars()
                .map(char::is_uppercase)
                .cmp(right.chars().map(char::is_uppercase))
        })
        .then_with(|| left.cmp(right))
}

/// Rearranges notes to follow `ids`.
///
/// Unknown ids and repeated ids are ignored. Notes missing from `ids` keep
/// their relative order after the named ones. Returns how many entries of
/// `ids` were ignored.
pub fn reorder_by_ids(notes: &mut Vec<Note>, ids: &[NoteId]) -> usize {
    let positions: HashMap<NoteId, usize> = notes
        .iter()
        .enumerate()
        .map(|(index, note)| (note.id, index))
        .collect();
    let mut remaining: Vec<Option<Note>> = std::mem::take(notes).into_iter().map(Some).collect();

    let mut ignored = 0;
    for id in ids {
        let note = positions
            .get(id)
            .and_then(|index| remaining[*index].take());
        match note {
            Some(note) => notes.push(note),
            None => ignored += 1,
        }
    }
    notes.extend(remaining.into_iter().flatten());
    ignored
}
