//! Note domain model and in-memory session state.
//!
//! # Responsibility
//! - Define the canonical note record and its wire shape.
//! - Hold the note collection and selection as an explicitly owned value.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` that never changes.
//! - A collection never contains the same `NoteId` twice.

pub mod note;
pub mod state;
