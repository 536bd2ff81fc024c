//! Time and identity sources injected into the note store.
//!
//! # Responsibility
//! - Supply "now" in epoch milliseconds for note timestamps.
//! - Supply fresh note ids.
//!
//! # Invariants
//! - `IdGenerator` implementations never return the same id twice for one
//!   generator instance.

use crate::model::note::NoteId;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait Clock {
    /// Current time as Unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Manually driven clock for deterministic callers.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Source of new note ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> NoteId;
}

/// UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> NoteId {
        NoteId::random()
    }
}

/// Monotonic `<prefix>-<n>` ids, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NoteId {
        let value = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        NoteId::parse(value).unwrap_or_else(|_| NoteId::random())
    }
}
