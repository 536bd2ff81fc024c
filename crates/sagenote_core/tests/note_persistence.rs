use sagenote_core::db::{open_db, open_db_in_memory};
use sagenote_core::{
    KeyValueStore, KvNoteRepository, MemoryKeyValueStore, Note, NoteId, NotePatch,
    NoteRepository, NoteStore, SqliteKeyValueStore, StorageError, StoreError, NOTES_STORAGE_KEY,
};
use rusqlite::Connection;

fn note(id: &str, title: &str, content: &str, last_modified: i64) -> Note {
    let mut note = Note::new(NoteId::parse(id).unwrap(), last_modified);
    note.title = title.to_string();
    note.content = content.to_string();
    note
}

fn memory_repo_with(raw: &str) -> KvNoteRepository<MemoryKeyValueStore> {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(NOTES_STORAGE_KEY, raw).unwrap();
    KvNoteRepository::new(kv)
}

#[test]
fn save_then_load_roundtrips_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(conn).unwrap());
    let notes = vec![
        note("b", "Groceries", "milk\neggs", 1_700_000_000_500),
        note("a", "Ideas", "", 1_700_000_000_000),
    ];

    repo.save_notes(&notes).unwrap();

    assert_eq!(repo.load_notes().unwrap(), notes);
}

#[test]
fn load_ignores_key_order_in_stored_objects() {
    let repo = memory_repo_with(
        r#"[{"lastModified":5,"content":"c","id":"x","title":"t"}]"#,
    );

    assert_eq!(repo.load_notes().unwrap(), vec![note("x", "t", "c", 5)]);
}

#[test]
fn load_without_stored_entry_is_empty() {
    let repo = KvNoteRepository::new(MemoryKeyValueStore::new());
    assert!(repo.load_notes().unwrap().is_empty());
}

#[test]
fn load_on_corrupt_data_is_empty() {
    for raw in ["{not json", "{\"id\":\"a\"}", "null", "[{\"id\":\"\",\"lastModified\":1}]"] {
        let repo = memory_repo_with(raw);
        assert!(repo.load_notes().unwrap().is_empty(), "payload {raw} should load as empty");
    }
}

#[test]
fn load_skips_invalid_records_and_keeps_valid_ones() {
    let repo = memory_repo_with(
        r#"[{"id":"a","title":"keep me","content":"body","lastModified":1},
            {"id":"b","title":"broken","content":"","lastModified":null},
            {"id":"c","title":"no timestamp","content":""}]"#,
    );

    assert_eq!(repo.load_notes().unwrap(), vec![note("a", "keep me", "body", 1)]);
}

#[test]
fn store_over_partly_invalid_data_keeps_valid_notes_on_next_save() {
    let repo = memory_repo_with(
        r#"[{"id":"a","title":"keep me","content":"","lastModified":1},
            {"id":"b","title":"","content":"","lastModified":null}]"#,
    );
    let mut store = NoteStore::open(repo).unwrap();
    assert_eq!(store.notes().len(), 1);

    let created = store.create().unwrap();

    let reloaded = store.repository().load_notes().unwrap();
    let ids: Vec<&str> = reloaded.iter().map(|note| note.id().as_str()).collect();
    assert_eq!(ids, [created.as_str(), "a"]);
    assert_eq!(reloaded[1].title, "keep me");
}

#[test]
fn read_failure_is_not_loaded_as_empty() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(
        NOTES_STORAGE_KEY,
        r#"[{"id":"a","title":"keep me","content":"","lastModified":1}]"#,
    )
    .unwrap();
    kv.set_fail_reads(true);

    let repo = KvNoteRepository::new(kv.clone());
    assert!(matches!(
        repo.load_notes().unwrap_err(),
        StorageError::ReadFailed { .. }
    ));

    let err = NoteStore::open(KvNoteRepository::new(kv.clone())).err().unwrap();
    assert!(matches!(err, StoreError::Load(StorageError::ReadFailed { .. })));

    kv.set_fail_reads(false);
    let stored = kv.get(NOTES_STORAGE_KEY).unwrap().unwrap();
    assert!(stored.contains("keep me"));
}

#[test]
fn load_accepts_legacy_timestamp_ids_and_iso_dates() {
    let repo = memory_repo_with(
        r#"[
            {"id":"1700000000000","title":"Untitled Note","content":"hi","lastModified":"2023-11-14T22:13:20.000Z"},
            {"id":"1690000000000","title":"Old","content":"","lastModified":1690000000000}
        ]"#,
    );

    let notes = repo.load_notes().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id().as_str(), "1700000000000");
    assert_eq!(notes[0].last_modified, 1_700_000_000_000);
    assert_eq!(notes[1].last_modified, 1_690_000_000_000);
}

#[test]
fn load_drops_duplicate_ids_keeping_first() {
    let repo = memory_repo_with(
        r#"[{"id":"a","title":"first","content":"","lastModified":1},
            {"id":"a","title":"second","content":"","lastModified":2}]"#,
    );

    let notes = repo.load_notes().unwrap();
    assert_eq!(notes, vec![note("a", "first", "", 1)]);
}

#[test]
fn save_overwrites_previous_collection() {
    let mut repo = KvNoteRepository::new(MemoryKeyValueStore::new());
    repo.save_notes(&[note("a", "one", "", 1), note("b", "two", "", 2)])
        .unwrap();
    repo.save_notes(&[note("c", "three", "", 3)]).unwrap();

    assert_eq!(repo.load_notes().unwrap(), vec![note("c", "three", "", 3)]);
}

#[test]
fn save_failure_is_reported() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set_reject_writes(true);
    let mut repo = KvNoteRepository::new(kv);

    let err = repo.save_notes(&[note("a", "t", "", 1)]).unwrap_err();
    assert!(matches!(err, StorageError::WriteRejected { .. }));
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sagenote.sqlite3");

    let created_id = {
        let conn = open_db(&path).unwrap();
        let repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(conn).unwrap());
        let mut store = NoteStore::open(repo).unwrap();
        let id = store.create().unwrap();
        store
            .update(&id, NotePatch::title("Persisted").with_content("across sessions"))
            .unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(conn).unwrap());
    let store = NoteStore::open(repo).unwrap();

    assert_eq!(store.notes().len(), 1);
    let loaded = &store.notes()[0];
    assert_eq!(loaded.id(), &created_id);
    assert_eq!(loaded.title, "Persisted");
    assert_eq!(loaded.content, "across sessions");
    assert_eq!(store.selected_id(), None);
}

#[test]
fn sqlite_store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStore::try_new(conn).err().unwrap();
    assert!(matches!(err, StorageError::MissingRequiredTable("kv_entries")));
}

#[test]
fn sqlite_store_remove_deletes_entry() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKeyValueStore::try_new(conn).unwrap();
    kv.set("k", "v").unwrap();
    kv.set("k", "v2").unwrap();
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));

    kv.remove("k").unwrap();
    assert_eq!(kv.get("k").unwrap(), None);
    let rows: i64 = kv
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}
