//! Query views over the note collection.
//!
//! # Responsibility
//! - Provide non-mutating, order-preserving filtered views.
//!
//! # Invariants
//! - Views borrow the collection; they never copy or reorder notes.

pub mod view;
