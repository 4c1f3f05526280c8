use notedesk_core::{
    ManualClock, NoteStore, Persistence, PersistenceError, SqlitePersistence, StoreConfig,
    THEME_STORAGE_KEY,
};

#[test]
fn collection_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    let clock = ManualClock::new(1_704_067_200_000);

    let expected = {
        let persistence = SqlitePersistence::open(&path).unwrap();
        let mut store = NoteStore::load(persistence, clock.clone()).unwrap();
        let first = store.add("first", "one", "", "").unwrap().unwrap();
        clock.advance_millis(1_000);
        let second = store.add("second", "two", "work", "a,b").unwrap().unwrap();
        store.toggle_important(first.id).unwrap();
        store.reorder(&[second.id, first.id]).unwrap();
        store.notes().to_vec()
    };

    let reopened = SqlitePersistence::open(&path).unwrap();
    let store = NoteStore::load(reopened, clock).unwrap();
    assert_eq!(store.notes(), expected.as_slice());
}

#[test]
fn theme_slot_is_left_untouched() {
    let persistence = SqlitePersistence::open_in_memory().unwrap();
    persistence.write_raw_slot(THEME_STORAGE_KEY, "dark").unwrap();

    let mut store = NoteStore::load(persistence, ManualClock::new(5)).unwrap();
    store.add("t", "x", "", "").unwrap();
    store.import_all("[]").unwrap();

    assert_eq!(
        store
            .persistence()
            .raw_slot(THEME_STORAGE_KEY)
            .unwrap()
            .as_deref(),
        Some("dark")
    );
    assert_eq!(
        store.persistence().raw_slot("notes").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn custom_storage_key_isolates_collections() {
    let persistence = SqlitePersistence::open_in_memory().unwrap();
    let config = StoreConfig::with_storage_key("archive").unwrap();
    let mut store = NoteStore::load_with_config(persistence, ManualClock::new(5), config).unwrap();
    store.add("archived", "x", "", "").unwrap();

    assert_eq!(store.storage_key(), "archive");
    assert!(store.persistence().load("notes").unwrap().is_none());
    assert_eq!(store.persistence().load("archive").unwrap().unwrap().len(), 1);
}

#[test]
fn unreadable_sqlite_slot_loads_as_empty_collection() {
    let persistence = SqlitePersistence::open_in_memory().unwrap();
    persistence.write_raw_slot("notes", "[1,2,3]").unwrap();
    assert!(matches!(
        persistence.load("notes"),
        Err(PersistenceError::Decode(_))
    ));

    let store = NoteStore::load(persistence, ManualClock::new(5)).unwrap();
    assert!(store.is_empty());
}
