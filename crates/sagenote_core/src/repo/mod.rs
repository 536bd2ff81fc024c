//! Persistence layer contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value storage contract (local-storage analogue).
//! - Mirror the note collection into that storage.
//!
//! # Invariants
//! - Note persistence writes whole collections, never single records.

pub mod kv_repo;
pub mod note_repo;
