//! Core domain logic for SageNote.
//! This crate owns the note collection rules and their persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NotePatch, NoteValidationError, DEFAULT_NOTE_TITLE};
pub use model::state::{reduce, NoteAction, NoteState};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use repo::note_repo::{KvNoteRepository, NoteRepository, NOTES_STORAGE_KEY};
pub use service::clock::{
    Clock, IdGenerator, ManualClock, RandomIdGenerator, SequentialIdGenerator, SystemClock,
};
pub use service::note_store::{NoteStore, StoreError, StoreResult};
pub use service::preferences::{load_theme, save_theme, toggle_theme, Theme, THEME_STORAGE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
