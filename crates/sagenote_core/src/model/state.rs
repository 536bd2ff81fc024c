//! Note collection state and its pure transition function.
//!
//! # Responsibility
//! - Own the ordered note collection and the selection pointer.
//! - Express every mutation as `reduce(state, action) -> state`.
//!
//! # Invariants
//! - The most recently created note is first; updates never reorder.
//! - Each `NoteId` appears at most once.
//! - Selection is `None` or an id; it is not validated on `Select`.
//! - Actions on unknown ids are no-ops.

use crate::model::note::{Note, NoteId, NotePatch};
use std::collections::HashSet;

/// One state transition driven by a front-end event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteAction {
    /// Prepend a new default note and select it.
    Create { id: NoteId, now_ms: i64 },
    /// Apply a partial update to an existing note.
    Update {
        id: NoteId,
        patch: NotePatch,
        now_ms: i64,
    },
    /// Remove a note, moving selection if it pointed at the removed note.
    Delete { id: NoteId },
    /// Point selection at `id` without checking it exists.
    Select { id: NoteId },
}

impl NoteAction {
    /// Whether this action can change the note collection.
    ///
    /// Selection-only actions never require persistence.
    pub fn mutates_collection(&self) -> bool {
        !matches!(self, Self::Select { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "note_create",
            Self::Update { .. } => "note_update",
            Self::Delete { .. } => "note_delete",
            Self::Select { .. } => "note_select",
        }
    }
}

/// In-memory note collection plus selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteState {
    notes: Vec<Note>,
    selected: Option<NoteId>,
}

impl NoteState {
    /// Builds a state from loaded notes with nothing selected.
    ///
    /// Later duplicates of an id are dropped; the first occurrence wins.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: dedupe_by_id(notes),
            selected: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    /// Returns the selected note, or `None` when nothing is selected or the
    /// selection points at an id that is not in the collection.
    pub fn current_note(&self) -> Option<&Note> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Applies one action and returns the resulting state.
pub fn reduce(mut state: NoteState, action: NoteAction) -> NoteState {
    match action {
        NoteAction::Create { id, now_ms } => {
            if !state.contains(&id) {
                state.notes.insert(0, Note::new(id.clone(), now_ms));
                state.selected = Some(id);
            }
        }
        NoteAction::Update { id, patch, now_ms } => {
            if let Some(note) = state.notes.iter_mut().find(|note| note.id() == &id) {
                note.apply(patch, now_ms);
            }
        }
        NoteAction::Delete { id } => {
            let before = state.notes.len();
            state.notes.retain(|note| note.id() != &id);
            let removed = state.notes.len() != before;
            if removed && state.selected.as_ref() == Some(&id) {
                state.selected = state.notes.first().map(|note| note.id().clone());
            }
        }
        NoteAction::Select { id } => {
            state.selected = Some(id);
        }
    }
    state
}

/// Drops later notes whose id already appeared.
pub(crate) fn dedupe_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());
    notes
        .into_iter()
        .filter(|note| seen.insert(note.id().clone()))
        .collect()
}
