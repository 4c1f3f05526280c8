//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection rules and persistence into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_store;
pub mod ordering;
