//! Persistence abstractions and backend implementations.
//!
//! # Responsibility
//! - Define the slot-level contract `NoteStore` saves through.
//! - Isolate SQLite and in-memory storage details from store logic.
//!
//! # Invariants
//! - Backends store the exact ordered collection they were given.
//! - Backends report storage failures instead of swallowing them.

pub mod memory_repo;
pub mod persistence;
pub mod sqlite_repo;
