//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note collection use-cases to Dart via FRB.
//! - Translate core outcomes into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call loads the store, applies one operation and returns only after
//!   the resulting save completed, so the next call reads its own writes.
//! - Calls are serialized process-wide; at most one save is in flight.

use log::{error, warn};
use notedesk_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    LoggingConfig, Note, NoteId, NoteStore, SortOrder, SqlitePersistence, StoreResult,
    SystemClock,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

const NOTES_DB_FILE_NAME: &str = "notedesk_notes.sqlite3";
static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_GATE: Mutex<()> = Mutex::new(());

type FfiNoteStore = NoteStore<SqlitePersistence, SystemClock>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LoggingConfig::new(level, log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Note projection returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    /// `None` for legacy item stubs.
    pub text: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub date: String,
    pub important: bool,
}

impl From<&Note> for NoteItem {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            text: note.text.clone(),
            category: note.category.clone(),
            tags: note.tags.clone(),
            date: note.date.clone(),
            important: note.important,
        }
    }
}

/// Ordered note list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    /// Whether the underlying operation succeeded.
    pub ok: bool,
    /// Notes in display order (empty on failure).
    pub items: Vec<NoteItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteListResponse {
    fn success(items: Vec<NoteItem>) -> Self {
        let message = if items.is_empty() {
            "No notes.".to_string()
        } else {
            format!("{} note(s).", items.len())
        };
        Self {
            ok: true,
            items,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// `false` only for storage/import failures.
    pub ok: bool,
    /// `false` when the call was a validation or not-found no-op.
    pub changed: bool,
    /// Affected note id, when one applies.
    pub note_id: Option<i64>,
    /// Export payload for `notes_export`.
    pub payload: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteActionResponse {
    fn changed(message: impl Into<String>, note_id: Option<NoteId>) -> Self {
        Self {
            ok: true,
            changed: true,
            note_id,
            payload: None,
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: false,
            note_id: None,
            payload: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            note_id: None,
            payload: None,
            message: message.into(),
        }
    }
}

/// Lists all notes in collection order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NoteListResponse {
    notes_list_at(&resolve_notes_db_path())
}

/// Lists notes whose title or text contains `query`, case-insensitively.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(query: String) -> NoteListResponse {
    notes_search_at(&resolve_notes_db_path(), &query)
}

/// Creates a note. Blank title or text is reported as `changed=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(title: String, text: String, category: String, tags: String) -> NoteActionResponse {
    notes_add_at(&resolve_notes_db_path(), &title, &text, &category, &tags)
}

/// Replaces title and text of one note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update(id: i64, title: String, text: String) -> NoteActionResponse {
    notes_update_at(&resolve_notes_db_path(), id, &title, &text)
}

/// Deletes one note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(id: i64) -> NoteActionResponse {
    notes_delete_at(&resolve_notes_db_path(), id)
}

/// Flips the importance flag of one note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_toggle_important(id: i64) -> NoteActionResponse {
    notes_toggle_important_at(&resolve_notes_db_path(), id)
}

/// Sorts by `date|title|important` and returns the new order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_sort(order: String) -> NoteListResponse {
    notes_sort_at(&resolve_notes_db_path(), &order)
}

/// Applies a drag-and-drop order and returns the resulting list.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_reorder(ids: Vec<i64>) -> NoteListResponse {
    notes_reorder_at(&resolve_notes_db_path(), &ids)
}

/// Serializes the whole collection for download.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_export() -> NoteActionResponse {
    notes_export_at(&resolve_notes_db_path())
}

/// Replaces the collection with an uploaded export payload.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_import(payload: String) -> NoteActionResponse {
    notes_import_at(&resolve_notes_db_path(), &payload)
}

fn notes_list_at(db_path: &Path) -> NoteListResponse {
    list_response(
        with_note_store_at(db_path, |store| Ok(to_items(store.notes()))),
        "notes_list",
    )
}

fn notes_search_at(db_path: &Path, query: &str) -> NoteListResponse {
    let result = with_note_store_at(db_path, |store| {
        Ok(store.search(query).iter().map(NoteItem::from).collect())
    });
    list_response(result, "notes_search")
}

fn notes_add_at(
    db_path: &Path,
    title: &str,
    text: &str,
    category: &str,
    tags: &str,
) -> NoteActionResponse {
    match with_note_store_at(db_path, |store| store.add(title, text, category, tags)) {
        Ok(Some(note)) => NoteActionResponse::changed("Note added.", Some(note.id)),
        Ok(None) => NoteActionResponse::unchanged("Title and text are required."),
        Err(err) => NoteActionResponse::failure(format!("notes_add failed: {err}")),
    }
}

fn notes_update_at(db_path: &Path, id: NoteId, title: &str, text: &str) -> NoteActionResponse {
    flag_response(
        id,
        with_note_store_at(db_path, |store| store.update(id, title, text)),
        "Note updated.",
        "notes_update",
    )
}

fn notes_delete_at(db_path: &Path, id: NoteId) -> NoteActionResponse {
    flag_response(
        id,
        with_note_store_at(db_path, |store| store.delete(id)),
        "Note deleted.",
        "notes_delete",
    )
}

fn notes_toggle_important_at(db_path: &Path, id: NoteId) -> NoteActionResponse {
    flag_response(
        id,
        with_note_store_at(db_path, |store| store.toggle_important(id)),
        "Note importance toggled.",
        "notes_toggle_important",
    )
}

fn notes_sort_at(db_path: &Path, order: &str) -> NoteListResponse {
    let order = match order.parse::<SortOrder>() {
        Ok(order) => order,
        Err(err) => return NoteListResponse::failure(format!("notes_sort failed: {err}")),
    };
    let result = with_note_store_at(db_path, |store| {
        store.sort(order)?;
        Ok(to_items(store.notes()))
    });
    list_response(result, "notes_sort")
}

fn notes_reorder_at(db_path: &Path, ids: &[NoteId]) -> NoteListResponse {
    let result = with_note_store_at(db_path, |store| {
        store.reorder(ids)?;
        Ok(to_items(store.notes()))
    });
    list_response(result, "notes_reorder")
}

fn notes_export_at(db_path: &Path) -> NoteActionResponse {
    match with_note_store_at(db_path, |store| store.export_all()) {
        Ok(payload) => NoteActionResponse {
            payload: Some(payload),
            ..NoteActionResponse::unchanged("Notes exported.")
        },
        Err(err) => NoteActionResponse::failure(format!("notes_export failed: {err}")),
    }
}

fn notes_import_at(db_path: &Path, payload: &str) -> NoteActionResponse {
    import_response(with_note_store_at(db_path, |store| store.import_all(payload)))
}

fn import_response(result: Result<usize, String>) -> NoteActionResponse {
    match result {
        Ok(count) => NoteActionResponse::changed(format!("Imported {count} note(s)."), None),
        Err(err) => NoteActionResponse::failure(format!("notes_import failed: {err}")),
    }
}

fn flag_response(
    id: NoteId,
    result: Result<bool, String>,
    success_message: &str,
    operation: &str,
) -> NoteActionResponse {
    match result {
        Ok(true) => NoteActionResponse::changed(success_message, Some(id)),
        Ok(false) => NoteActionResponse::unchanged(format!("Note {id} was not changed.")),
        Err(err) => NoteActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn list_response(result: Result<Vec<NoteItem>, String>, operation: &str) -> NoteListResponse {
    match result {
        Ok(items) => NoteListResponse::success(items),
        Err(err) => NoteListResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn to_items(notes: &[Note]) -> Vec<NoteItem> {
    notes.iter().map(NoteItem::from).collect()
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("NOTEDESK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}

fn with_note_store_at<T>(
    db_path: &Path,
    f: impl FnOnce(&mut FfiNoteStore) -> StoreResult<T>,
) -> Result<T, String> {
    let _gate = STORE_GATE.lock().unwrap_or_else(PoisonError::into_inner);
    let persistence = SqlitePersistence::open(db_path).map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error error_code=db_open_failed error={err}");
        format!("notes DB open failed: {err}")
    })?;
    let mut store = NoteStore::load(persistence, SystemClock).map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error error_code=store_load_failed error={err}");
        format!("notes store load failed: {err}")
    })?;
    f(&mut store).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, notes_add_at, notes_delete_at, notes_export_at,
        notes_import_at, notes_list_at, notes_reorder_at, notes_search_at, notes_sort,
        notes_sort_at, notes_toggle_important_at, notes_update_at, ping,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn scratch_db() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.sqlite3");
        (dir, path)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn notes_add_then_search_finds_created_note() {
        let (_dir, db) = scratch_db();
        let created = notes_add_at(&db, "Weekly plan", "body", "cat", "a, b");
        assert!(created.ok, "{}", created.message);
        assert!(created.changed);
        let note_id = created.note_id.expect("created note should return id");

        let response = notes_search_at(&db, "WEEKLY");
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, note_id);
        assert_eq!(response.items[0].tags, vec!["a", "b"]);

        assert_eq!(notes_list_at(&db).items.len(), 1);
    }

    #[test]
    fn notes_add_reports_blank_input_as_unchanged() {
        let (_dir, db) = scratch_db();
        let response = notes_add_at(&db, "  ", "body", "", "");
        assert!(response.ok);
        assert!(!response.changed);
        assert_eq!(response.note_id, None);
        assert!(notes_list_at(&db).items.is_empty());
    }

    #[test]
    fn notes_update_toggle_and_delete_report_changes() {
        let (_dir, db) = scratch_db();
        let created = notes_add_at(&db, "draft", "body", "", "");
        let note_id = created.note_id.expect("created note should return id");

        let updated = notes_update_at(&db, note_id, "draft v2", "new body");
        assert!(updated.changed, "{}", updated.message);

        let toggled = notes_toggle_important_at(&db, note_id);
        assert!(toggled.changed, "{}", toggled.message);
        let found = notes_search_at(&db, "draft");
        assert!(found.items[0].important);
        assert_eq!(found.items[0].text.as_deref(), Some("new body"));

        let exported = notes_export_at(&db);
        assert!(exported.payload.unwrap_or_default().contains("draft v2"));

        assert!(notes_delete_at(&db, note_id).changed);
        let missing = notes_delete_at(&db, note_id);
        assert!(missing.ok);
        assert!(!missing.changed);
        assert!(notes_list_at(&db).items.is_empty());
    }

    #[test]
    fn notes_sort_rejects_unknown_order() {
        let response = notes_sort("color".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("unsupported sort order"));
    }

    #[test]
    fn sort_and_reorder_return_persisted_order() {
        let (_dir, db) = scratch_db();
        let payload = r#"[{"id":1,"title":"beta","text":"x"},{"id":2,"title":"alpha","text":"x"},{"id":3,"title":"gamma","text":"x"}]"#;
        assert!(notes_import_at(&db, payload).ok);

        let sorted = notes_sort_at(&db, "title");
        let ids: Vec<i64> = sorted.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let reordered = notes_reorder_at(&db, &[3, 1]);
        let ids: Vec<i64> = reordered.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let listed: Vec<i64> = notes_list_at(&db).items.iter().map(|item| item.id).collect();
        assert_eq!(listed, vec![3, 1, 2]);
    }

    #[test]
    fn import_replaces_collection_and_rejects_malformed_payload() {
        let (_dir, db) = scratch_db();
        let payload = r#"[{"id":1,"title":"a","text":"x"},{"id":2,"title":"b","date":"1/1/2024"}]"#;

        let imported = notes_import_at(&db, payload);
        assert!(imported.ok, "{}", imported.message);
        assert!(imported.message.contains("Imported 2"));

        let ids: Vec<i64> = notes_list_at(&db).items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let malformed = notes_import_at(&db, "{\"not\":\"a list\"}");
        assert!(!malformed.ok);
        assert!(malformed.message.contains("import failed"));
        assert_eq!(notes_list_at(&db).items.len(), 2);
    }
}
