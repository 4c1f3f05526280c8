//! Core domain logic for NoteDesk.
//! This crate is the single source of truth for note collection invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfigError, LoggingConfig, StoreConfig, NOTES_STORAGE_KEY, THEME_STORAGE_KEY,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date::{format_note_date, parse_note_date};
pub use model::note::{parse_tags, Note, NoteId};
pub use model::record::{DecodeError, NoteRecord};
pub use repo::memory_repo::MemoryPersistence;
pub use repo::persistence::{Persistence, PersistenceError, PersistenceResult};
pub use repo::sqlite_repo::SqlitePersistence;
pub use search::view::NoteSearch;
pub use service::note_store::{NoteStore, StoreError, StoreResult};
pub use service::ordering::SortOrder;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
