use sagenote_core::{
    KeyValueStore, KvNoteRepository, ManualClock, MemoryKeyValueStore, NoteId, NotePatch,
    NoteRepository, NoteStore, RandomIdGenerator, SequentialIdGenerator, StoreError,
    NOTES_STORAGE_KEY,
};
use std::collections::HashSet;

type TestStore<'c> =
    NoteStore<KvNoteRepository<MemoryKeyValueStore>, &'c ManualClock, SequentialIdGenerator>;

fn open_store(clock: &ManualClock) -> TestStore<'_> {
    NoteStore::with_parts(
        KvNoteRepository::new(MemoryKeyValueStore::new()),
        clock,
        SequentialIdGenerator::new("n"),
    )
    .unwrap()
}

fn stored_json(store: &TestStore<'_>) -> Option<String> {
    store
        .repository()
        .store()
        .get(NOTES_STORAGE_KEY)
        .unwrap()
}

fn ids(store: &TestStore<'_>) -> Vec<String> {
    store
        .notes()
        .iter()
        .map(|note| note.id().to_string())
        .collect()
}

#[test]
fn create_assigns_unique_ids_even_within_one_millisecond() {
    let clock = ManualClock::new(1_000);
    let mut store = NoteStore::with_parts(
        KvNoteRepository::new(MemoryKeyValueStore::new()),
        &clock,
        RandomIdGenerator,
    )
    .unwrap();

    for _ in 0..200 {
        store.create().unwrap();
    }

    let unique: HashSet<_> = store.notes().iter().map(|note| note.id().clone()).collect();
    assert_eq!(unique.len(), 200);
}

#[test]
fn create_selects_new_note_and_places_it_first() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);

    let first = store.create().unwrap();
    clock.advance(10);
    let second = store.create().unwrap();

    assert_eq!(store.selected_id(), Some(&second));
    assert_eq!(ids(&store), vec![second.to_string(), first.to_string()]);
    let current = store.current_note().unwrap();
    assert_eq!(current.title, "Untitled Note");
    assert_eq!(current.content, "");
    assert_eq!(current.last_modified, 1_010);
}

#[test]
fn update_changes_only_patched_fields_and_timestamp() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let id = store.create().unwrap();
    store.update(&id, NotePatch::content("body")).unwrap();

    clock.advance(500);
    store.update(&id, NotePatch::title("X")).unwrap();

    let note = store.current_note().unwrap();
    assert_eq!(note.title, "X");
    assert_eq!(note.content, "body");
    assert_eq!(note.last_modified, 1_500);
}

#[test]
fn update_with_empty_patch_still_refreshes_timestamp() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let id = store.create().unwrap();

    clock.advance(1);
    store.update(&id, NotePatch::default()).unwrap();

    assert_eq!(store.current_note().unwrap().last_modified, 1_001);
}

#[test]
fn update_on_missing_id_leaves_collection_identical() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    store.create().unwrap();
    let before_state = store.state().clone();
    let before_json = stored_json(&store);

    clock.advance(99);
    store
        .update(
            &NoteId::parse("missing").unwrap(),
            NotePatch::title("nope").with_content("nope"),
        )
        .unwrap();

    assert_eq!(store.state(), &before_state);
    assert_eq!(stored_json(&store), before_json);
}

#[test]
fn delete_selected_middle_note_moves_selection_to_first() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let c = store.create().unwrap();
    let b = store.create().unwrap();
    let a = store.create().unwrap();
    assert_eq!(ids(&store), vec![a.to_string(), b.to_string(), c.to_string()]);

    store.select(b.clone());
    store.delete(&b).unwrap();

    assert_eq!(store.selected_id(), Some(&a));
    assert_eq!(ids(&store), vec![a.to_string(), c.to_string()]);
}

#[test]
fn delete_last_note_clears_selection() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let only = store.create().unwrap();

    store.delete(&only).unwrap();

    assert!(store.notes().is_empty());
    assert_eq!(store.selected_id(), None);
    assert_eq!(stored_json(&store).as_deref(), Some("[]"));
}

#[test]
fn delete_of_other_note_keeps_selection() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let older = store.create().unwrap();
    let newer = store.create().unwrap();

    store.delete(&older).unwrap();

    assert_eq!(store.selected_id(), Some(&newer));
}

#[test]
fn delete_twice_equals_delete_once() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let keep = store.create().unwrap();
    let gone = store.create().unwrap();

    store.delete(&gone).unwrap();
    let after_once = store.state().clone();
    let json_once = stored_json(&store);
    store.delete(&gone).unwrap();

    assert_eq!(store.state(), &after_once);
    assert_eq!(stored_json(&store), json_once);
    assert_eq!(store.selected_id(), Some(&keep));
}

#[test]
fn select_does_not_validate_and_does_not_persist() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    store.create().unwrap();
    store.repository_mut().store_mut().set_reject_writes(true);

    store.select(NoteId::parse("ghost").unwrap());

    assert_eq!(store.selected_id().map(NoteId::as_str), Some("ghost"));
    assert!(store.current_note().is_none());
}

#[test]
fn every_mutation_mirrors_full_collection() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let id = store.create().unwrap();
    store.create().unwrap();
    store.update(&id, NotePatch::content("mirrored")).unwrap();

    let reloaded = store.repository().load_notes().unwrap();
    assert_eq!(reloaded.as_slice(), store.notes());
}

#[test]
fn failed_save_keeps_in_memory_change_and_reports_error() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    let id = store.create().unwrap();
    let persisted_before = stored_json(&store);
    store.repository_mut().store_mut().set_reject_writes(true);

    let err = store.update(&id, NotePatch::title("unsaved")).unwrap_err();

    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(store.current_note().unwrap().title, "unsaved");
    assert_eq!(stored_json(&store), persisted_before);

    store.repository_mut().store_mut().set_reject_writes(false);
    store.update(&id, NotePatch::content("healed")).unwrap();
    let reloaded = store.repository().load_notes().unwrap();
    assert_eq!(reloaded[0].title, "unsaved");
    assert_eq!(reloaded[0].content, "healed");
}

#[test]
fn reopened_store_loads_collection_without_selection() {
    let clock = ManualClock::new(1_000);
    let mut store = open_store(&clock);
    store.create().unwrap();
    let notes = store.notes().to_vec();
    let kv = store.repository().store().clone();

    let reopened = NoteStore::with_parts(
        KvNoteRepository::new(kv),
        &clock,
        SequentialIdGenerator::new("other"),
    )
    .unwrap();

    assert_eq!(reopened.notes(), notes.as_slice());
    assert_eq!(reopened.selected_id(), None);
}
