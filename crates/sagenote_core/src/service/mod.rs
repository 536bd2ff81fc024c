//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state transitions and persistence into use-case APIs.
//! - Keep front ends decoupled from storage details.

pub mod clock;
pub mod note_store;
pub mod preferences;
