//! Flutter-facing boundary for NoteDesk core.
//!
//! Dart bindings are generated from `api` by flutter_rust_bridge codegen.

pub mod api;
