//! JSON wire shape for notes.
//!
//! # Responsibility
//! - Map `Note` to and from the export/persistence record layout.
//! - Decode whole collections with best-effort shape detection.
//!
//! # Invariants
//! - Field names are `id,title,text,category,tags,date,important`.
//! - Item stubs serialize as `{id,title,date}` only.
//! - A present `text` key makes a full note, even when its value is `null`.
//! - Optional fields with a foreign type decode as absent; only `id` and
//!   `title` can disqualify a record.
//! - A collection payload must be a JSON array of objects; anything else is
//!   rejected as a whole.
//! - Decoded collections never contain duplicate ids (first record wins).

use crate::model::note::{parse_tags, Note, NoteId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Permissive wire record accepting both historical note shapes.
///
/// Only `id` and `title` are required. A present `text` marks a full note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Integer id; integer strings are accepted on input.
    #[serde(deserialize_with = "deserialize_note_id")]
    pub id: NoteId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    /// Arrays keep their string entries; a plain string is split like tag input.
    #[serde(
        default,
        deserialize_with = "deserialize_loose_tags",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_loose_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub important: Option<bool>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        let date = record.date.unwrap_or_default();
        match record.text {
            Some(text) => Self {
                id: record.id,
                title: record.title,
                text: Some(text),
                category: record.category.unwrap_or_default(),
                tags: record.tags.unwrap_or_default(),
                date,
                important: record.important.unwrap_or(false),
            },
            None => Self::item(record.id, record.title, date),
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        match note.text {
            Some(text) => Self {
                id: note.id,
                title: note.title,
                text: Some(text),
                category: Some(note.category),
                tags: Some(note.tags),
                date: Some(note.date),
                important: Some(note.important),
            },
            None => Self {
                id: note.id,
                title: note.title,
                text: None,
                category: None,
                tags: None,
                date: Some(note.date),
                important: None,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNoteId {
    Int(i64),
    Text(String),
}

fn deserialize_note_id<'de, D>(deserializer: D) -> Result<NoteId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawNoteId::deserialize(deserializer)? {
        RawNoteId::Int(value) => Ok(value),
        RawNoteId::Text(value) => value
            .trim()
            .parse::<NoteId>()
            .map_err(|_| {
                serde::de::Error::custom(format!("note id `{value}` is not an integer"))
            }),
    }
}

// Only called when the key is present, so `null` still yields a full note.
fn deserialize_present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    }))
}

fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

fn deserialize_loose_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(input) => Some(parse_tags(&input)),
        _ => None,
    })
}

fn deserialize_loose_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

/// Collection-level decode failure.
#[derive(Debug)]
pub enum DecodeError {
    /// Payload is not valid JSON.
    Json(serde_json::Error),
    /// Payload is valid JSON but not an array.
    NotAnArray,
    /// One array entry is not a JSON object.
    NonObjectEntry { index: usize },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "payload is not valid JSON: {err}"),
            Self::NotAnArray => write!(f, "payload must be a JSON array of note records"),
            Self::NonObjectEntry { index } => {
                write!(f, "entry at index {index} is not a note record object")
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnArray | Self::NonObjectEntry { .. } => None,
        }
    }
}

/// Decoded collection plus counters for dropped records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedCollection {
    /// Accepted notes in payload order.
    pub notes: Vec<Note>,
    /// Objects lacking a usable `id` or `title`.
    pub skipped: usize,
    /// Records dropped because an earlier record already used the id.
    pub duplicates: usize,
}

/// Serializes notes in order as a compact JSON array.
pub fn encode_collection(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string(notes)
}

/// Decodes a JSON array of note records.
///
/// # Errors
/// - `Json` when the payload cannot be parsed.
/// - `NotAnArray` / `NonObjectEntry` when the payload shape is wrong.
///
/// Individual objects that cannot be read as a record are counted in
/// `skipped` instead of failing the whole payload.
pub fn decode_collection(payload: &str) -> Result<DecodedCollection, DecodeError> {
    let value: Value = serde_json::from_str(payload).map_err(DecodeError::Json)?;
    let Value::Array(entries) = value else {
        return Err(DecodeError::NotAnArray);
    };

    if let Some(index) = entries.iter().position(|entry| !entry.is_object()) {
        return Err(DecodeError::NonObjectEntry { index });
    }

    let mut decoded = DecodedCollection {
        notes: Vec::with_capacity(entries.len()),
        ..DecodedCollection::default()
    };
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        let Ok(record) = serde_json::from_value::<NoteRecord>(entry) else {
            decoded.skipped += 1;
            continue;
        };
        if !seen.insert(record.id) {
            decoded.duplicates += 1;
            continue;
        }
        decoded.notes.push(Note::from(record));
    }

    Ok(decoded)
}
