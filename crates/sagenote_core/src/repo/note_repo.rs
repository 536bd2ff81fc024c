//! Note collection persistence over a key-value store.
//!
//! # Responsibility
//! - Load the whole note collection from the `notes` entry at startup.
//! - Overwrite the `notes` entry with the whole collection on every change.
//!
//! # Invariants
//! - Absent or unparseable data loads as empty; a failed read is an error,
//!   never an empty collection.
//! - Records that fail to decode are skipped one by one; the rest still load.
//! - Saving always writes the full collection; there are no incremental writes.
//! - The stored value is a JSON array of `{id, title, content, lastModified}`
//!   objects with no schema version.

use crate::model::note::Note;
use crate::model::state::dedupe_by_id;
use crate::repo::kv_repo::{KeyValueStore, StorageResult};
use log::{debug, error, info, warn};

/// Key of the entry holding the serialized note collection.
pub const NOTES_STORAGE_KEY: &str = "notes";

/// Persistence adapter for the note collection.
pub trait NoteRepository {
    /// Loads the stored collection, or an empty one when nothing usable is
    /// stored.
    ///
    /// # Errors
    /// - Returns the storage error when the entry cannot be read at all.
    fn load_notes(&self) -> StorageResult<Vec<Note>>;
    /// Replaces the stored collection with `notes`.
    fn save_notes(&mut self, notes: &[Note]) -> StorageResult<()>;
}

/// `NoteRepository` that mirrors the collection into one key-value entry.
pub struct KvNoteRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvNoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> NoteRepository for KvNoteRepository<S> {
    fn load_notes(&self) -> StorageResult<Vec<Note>> {
        let raw = match self.store.get(NOTES_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=notes_load module=repo status=ok source=empty note_count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=notes_load module=repo status=error error_code=read_failed error={err}"
                );
                return Err(err);
            }
        };

        match decode_notes(&raw) {
            Ok(decoded) => {
                let notes = dedupe_by_id(decoded.notes);
                let status = if decoded.skipped == 0 { "ok" } else { "partial" };
                info!(
                    "event=notes_load module=repo status={status} source=stored note_count={} skipped={}",
                    notes.len(),
                    decoded.skipped
                );
                Ok(notes)
            }
            Err(err) => {
                // Stored bytes may contain user text; log only the parse location.
                warn!(
                    "event=notes_load module=repo status=error error_code=corrupt_data line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_notes(&mut self, notes: &[Note]) -> StorageResult<()> {
        let encoded = encode_notes(notes)?;
        match self.store.set(NOTES_STORAGE_KEY, &encoded) {
            Ok(()) => {
                debug!(
                    "event=notes_save module=repo status=ok note_count={} bytes={}",
                    notes.len(),
                    encoded.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_save module=repo status=error note_count={} error={err}",
                    notes.len()
                );
                Err(err)
            }
        }
    }
}

/// Serializes a note collection to its stored JSON form.
pub fn encode_notes(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string(notes)
}

/// Notes decoded from a stored collection.
#[derive(Debug, Default, PartialEq)]
pub struct DecodedNotes {
    pub notes: Vec<Note>,
    /// Array elements that were not valid notes.
    pub skipped: usize,
}

/// Parses a stored JSON note collection.
///
/// Fails only when `raw` is not a JSON array. Elements that do not decode
/// as notes are skipped and counted.
pub fn decode_notes(raw: &str) -> serde_json::Result<DecodedNotes> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut decoded = DecodedNotes {
        notes: Vec::with_capacity(values.len()),
        skipped: 0,
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Note>(value) {
            Ok(note) => decoded.notes.push(note),
            Err(_) => {
                warn!(
                    "event=notes_load module=repo status=error error_code=invalid_record index={index}"
                );
                decoded.skipped += 1;
            }
        }
    }
    Ok(decoded)
}
