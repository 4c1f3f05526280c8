//! Note domain model and wire shapes.
//!
//! # Responsibility
//! - Define the single `Note` record used by the store and every backend.
//! - Own the JSON wire shape shared by persistence and export/import.
//! - Format and parse the human-readable note timestamps.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Full notes and item stubs share one type; `Note::text` tells them apart.

pub mod date;
pub mod note;
pub mod record;
