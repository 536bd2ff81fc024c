//! Note domain model.
//!
//! # Responsibility
//! - Define the note record shared by the store and the persistence layer.
//! - Describe partial updates (`NotePatch`) applied by the store.
//!
//! # Invariants
//! - `id` is assigned once at creation and has no public setter.
//! - `id` is never an empty string.
//! - `last_modified` is epoch milliseconds and is refreshed by every update.

use chrono::DateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title given to freshly created notes.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Opaque, stable note identifier.
///
/// New ids are random UUID v4 strings. Stored ids are accepted as any
/// non-empty string so collections written by older timestamp-based
/// front ends still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier.
    ///
    /// # Errors
    /// - Returns `NoteValidationError::EmptyId` for blank input.
    pub fn parse(value: impl Into<String>) -> Result<Self, NoteValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NoteId {
    type Error = NoteValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<NoteId> for String {
    fn from(value: NoteId) -> Self {
        value.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation error for note identity and wire fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Note id is empty or whitespace only.
    EmptyId,
    /// `lastModified` is neither epoch milliseconds nor an RFC 3339 string.
    InvalidTimestamp(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "note id must not be empty"),
            Self::InvalidTimestamp(value) => {
                write!(f, "invalid lastModified value `{value}`")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// A user-authored note.
///
/// Serialized with the camelCase field names used by the stored collection:
/// `id`, `title`, `content`, `lastModified`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Unix epoch milliseconds of the last create/update.
    #[serde(deserialize_with = "deserialize_epoch_ms")]
    pub last_modified: i64,
}

impl Note {
    /// Creates a note with default title, empty content and `now_ms` as
    /// modification time.
    pub fn new(id: NoteId, now_ms: i64) -> Self {
        Self {
            id,
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            last_modified: now_ms,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Applies the fields present in `patch` and refreshes `last_modified`.
    pub fn apply(&mut self, patch: NotePatch, now_ms: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.last_modified = now_ms;
    }
}

/// Partial note update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Patch that only replaces the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    /// Patch that only replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

fn deserialize_epoch_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(value) => Ok(value),
        RawTimestamp::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
        RawTimestamp::Float(value) => Err(de::Error::custom(
            NoteValidationError::InvalidTimestamp(value.to_string()),
        )),
        RawTimestamp::Text(value) => parse_timestamp_text(&value).map_err(de::Error::custom),
    }
}

/// Parses a textual `lastModified` value into epoch milliseconds.
///
/// Accepts decimal epoch milliseconds or RFC 3339 date-times such as
/// `2024-05-01T10:30:00.000Z`.
pub fn parse_timestamp_text(value: &str) -> Result<i64, NoteValidationError> {
    let trimmed = value.trim();
    if let Ok(millis) = trimmed.parse::<i64>() {
        return Ok(millis);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|_| NoteValidationError::InvalidTimestamp(value.to_string()))
}
