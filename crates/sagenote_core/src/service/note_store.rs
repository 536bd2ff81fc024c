//! Note store use-case facade.
//!
//! # Responsibility
//! - Own the session's `NoteState` and drive it through `reduce`.
//! - Persist the full collection after every collection mutation.
//!
//! # Invariants
//! - Mutations on unknown ids are silent no-ops that still persist, so the
//!   stored mirror always equals the in-memory collection after success.
//! - A failed save never rolls back the in-memory mutation; the error is
//!   returned and the next successful save rewrites the whole collection.
//! - `select` never touches storage.
//! - A store only exists after its collection was read, so saves never
//!   replace data that failed to load.

use crate::model::note::{Note, NoteId, NotePatch};
use crate::model::state::{reduce, NoteAction, NoteState};
use crate::repo::kv_repo::StorageError;
use crate::repo::note_repo::NoteRepository;
use crate::service::clock::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
#[derive(Debug)]
pub enum StoreError {
    /// Stored collection could not be read; nothing was loaded.
    Load(StorageError),
    /// Mutation applied in memory, but mirroring it to storage failed.
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load notes: {err}"),
            Self::Storage(err) => write!(f, "failed to persist notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Session-owned note collection with write-through persistence.
pub struct NoteStore<R, C = SystemClock, G = RandomIdGenerator>
where
    R: NoteRepository,
    C: Clock,
    G: IdGenerator,
{
    state: NoteState,
    repo: R,
    clock: C,
    ids: G,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Loads the stored collection using wall-clock time and random ids.
    pub fn open(repo: R) -> StoreResult<Self> {
        Self::with_parts(repo, SystemClock, RandomIdGenerator)
    }
}

impl<R, C, G> NoteStore<R, C, G>
where
    R: NoteRepository,
    C: Clock,
    G: IdGenerator,
{
    /// Loads the stored collection with injected time and id sources.
    ///
    /// Nothing is selected after loading.
    ///
    /// # Errors
    /// - Returns `StoreError::Load` when the stored entry cannot be read. No
    ///   store is built, so unread data is never overwritten by a later save.
    pub fn with_parts(repo: R, clock: C, ids: G) -> StoreResult<Self> {
        let notes = repo.load_notes().map_err(StoreError::Load)?;
        Ok(Self {
            state: NoteState::from_notes(notes),
            repo,
            clock,
            ids,
        })
    }

    pub fn state(&self) -> &NoteState {
        &self.state
    }

    pub fn notes(&self) -> &[Note] {
        self.state.notes()
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.state.selected_id()
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.state.current_note()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Creates a default note at the front and selects it.
    ///
    /// On `Err` the note still exists in memory and is selected.
    pub fn create(&mut self) -> StoreResult<NoteId> {
        let id = self.ids.next_id();
        let now_ms = self.clock.now_ms();
        self.dispatch(NoteAction::Create {
            id: id.clone(),
            now_ms,
        })?;
        Ok(id)
    }

    /// Applies `patch` to note `id` and refreshes its modification time.
    ///
    /// Unknown ids are ignored.
    pub fn update(&mut self, id: &NoteId, patch: NotePatch) -> StoreResult<()> {
        let now_ms = self.clock.now_ms();
        self.dispatch(NoteAction::Update {
            id: id.clone(),
            patch,
            now_ms,
        })
    }

    /// Removes note `id`; selection falls back to the first remaining note
    /// when the removed note was selected.
    ///
    /// Unknown ids are ignored.
    pub fn delete(&mut self, id: &NoteId) -> StoreResult<()> {
        self.dispatch(NoteAction::Delete { id: id.clone() })
    }

    /// Points selection at `id` without checking that it exists.
    pub fn select(&mut self, id: NoteId) {
        self.state = reduce(std::mem::take(&mut self.state), NoteAction::Select { id });
    }

    /// Applies one action, then persists when the action targets the
    /// collection.
    pub fn dispatch(&mut self, action: NoteAction) -> StoreResult<()> {
        let event = action.name();
        let persist = action.mutates_collection();
        self.state = reduce(std::mem::take(&mut self.state), action);

        if !persist {
            return Ok(());
        }

        match self.repo.save_notes(self.state.notes()) {
            Ok(()) => {
                debug!(
                    "event={event} module=store status=ok note_count={} has_selection={}",
                    self.state.len(),
                    self.state.selected_id().is_some()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error error_code=persist_failed note_count={} error={err}",
                    self.state.len()
                );
                Err(err.into())
            }
        }
    }
}
