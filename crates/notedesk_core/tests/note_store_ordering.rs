use notedesk_core::{ManualClock, MemoryPersistence, NoteId, NoteStore, SortOrder};
use serde_json::json;

fn store_from(records: serde_json::Value) -> NoteStore<MemoryPersistence, ManualClock> {
    let mut store =
        NoteStore::load(MemoryPersistence::new(), ManualClock::new(1_000)).unwrap();
    store.import_all(&records.to_string()).unwrap();
    store
}

fn ids(store: &NoteStore<MemoryPersistence, ManualClock>) -> Vec<NoteId> {
    store.notes().iter().map(|note| note.id).collect()
}

fn sorted_ids(store: &NoteStore<MemoryPersistence, ManualClock>) -> Vec<NoteId> {
    let mut ids = ids(store);
    ids.sort_unstable();
    ids
}

#[test]
fn sort_by_date_puts_recent_first_and_keeps_unparsable_in_place() {
    let mut store = store_from(json!([
        { "id": 1, "title": "jan", "text": "a", "date": "1/1/2024" },
        { "id": 2, "title": "feb", "text": "b", "date": "2/2/2024" },
        { "id": 3, "title": "odd", "text": "c", "date": "not a date" }
    ]));

    store.sort_by_date().unwrap();
    assert_eq!(ids(&store), vec![2, 1, 3]);
}

#[test]
fn sort_by_date_is_stable_for_equal_dates() {
    let mut store = store_from(json!([
        { "id": 1, "title": "a", "text": "x", "date": "3/3/2024, 9:00:00 AM" },
        { "id": 2, "title": "b", "text": "x", "date": "3/3/2024, 9:00:00 AM" },
        { "id": 3, "title": "c", "text": "x", "date": "3/3/2024, 9:00:00 PM" }
    ]));

    store.sort_by_date().unwrap();
    assert_eq!(ids(&store), vec![3, 1, 2]);
}

#[test]
fn sort_by_title_is_case_insensitive_and_stable() {
    let mut store = store_from(json!([
        { "id": 1, "title": "banana", "text": "x" },
        { "id": 2, "title": "Apple", "text": "x" },
        { "id": 3, "title": "cherry", "text": "x" },
        { "id": 4, "title": "apple", "text": "x" },
        { "id": 5, "title": "Apple", "text": "x" }
    ]));

    store.sort_by_title().unwrap();
    assert_eq!(ids(&store), vec![4, 2, 5, 1, 3]);
}

#[test]
fn sort_by_important_moves_flagged_notes_first() {
    let mut store = store_from(json!([
        { "id": 1, "title": "a", "text": "x" },
        { "id": 2, "title": "b", "text": "x", "important": true },
        { "id": 3, "title": "c", "date": "1/1/2024" },
        { "id": 4, "title": "d", "text": "x", "important": true }
    ]));

    store.sort_by_important().unwrap();
    assert_eq!(ids(&store), vec![2, 4, 1, 3]);
}

#[test]
fn every_sort_is_idempotent_and_preserves_ids() {
    let records = json!([
        { "id": 10, "title": "delta", "text": "x", "date": "5/5/2024", "important": true },
        { "id": 11, "title": "Alpha", "text": "x", "date": "garbage" },
        { "id": 12, "title": "charlie", "text": "x", "date": "1/9/2023" },
        { "id": 13, "title": "bravo", "date": "7/7/2024" }
    ]);

    for order in [SortOrder::DateDesc, SortOrder::TitleAsc, SortOrder::ImportantFirst] {
        let mut store = store_from(records.clone());
        let before = sorted_ids(&store);

        store.sort(order).unwrap();
        let once = ids(&store);
        store.sort(order).unwrap();

        assert_eq!(ids(&store), once, "{order:?} should be idempotent");
        assert_eq!(sorted_ids(&store), before, "{order:?} should keep ids");
    }
}

#[test]
fn sort_persists_new_order() {
    let mut store = store_from(json!([
        { "id": 1, "title": "b", "text": "x" },
        { "id": 2, "title": "a", "text": "x" }
    ]));
    store.sort_by_title().unwrap();

    let reloaded =
        NoteStore::load(store.persistence().clone(), ManualClock::new(1_000)).unwrap();
    assert_eq!(ids(&reloaded), vec![2, 1]);
}

#[test]
fn reorder_follows_caller_sequence() {
    let mut store = store_from(json!([
        { "id": 1, "title": "a", "text": "x" },
        { "id": 2, "title": "b", "text": "x" },
        { "id": 3, "title": "c", "text": "x" }
    ]));

    store.reorder(&[3, 1, 2]).unwrap();
    assert_eq!(ids(&store), vec![3, 1, 2]);

    store.reorder(&[2, 777, 3, 1]).unwrap();
    assert_eq!(ids(&store), vec![2, 3, 1]);

    let reloaded =
        NoteStore::load(store.persistence().clone(), ManualClock::new(1_000)).unwrap();
    assert_eq!(ids(&reloaded), vec![2, 3, 1]);
}

#[test]
fn search_filters_without_mutating() {
    let mut store = store_from(json!([
        { "id": 1, "title": "Groceries", "text": "milk, eggs" },
        { "id": 2, "title": "Work", "text": "quarterly report" },
        { "id": 3, "title": "Eggnog recipe", "date": "12/1/2023" }
    ]));

    let view = store.search("EGG");
    assert_eq!(view.ids(), vec![1, 3]);
    assert_eq!(view.iter().count(), 2);
    assert_eq!(store.search("").ids(), vec![1, 2, 3]);

    store.delete(1).unwrap();
    assert_eq!(store.search("egg").ids(), vec![3]);
    assert_eq!(store.len(), 2);
}
