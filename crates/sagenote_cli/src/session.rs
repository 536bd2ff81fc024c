//! Interactive session: dispatches commands to the note store.
//!
//! # Responsibility
//! - Own the note store and theme for one run of the front end.
//! - Render command results as plain text lines.
//!
//! # Invariants
//! - Commands are handled one at a time, each to completion.
//! - Storage failures are reported but never end the session.

use crate::commands::{Command, USAGE};
use chrono::{DateTime, Local};
use sagenote_core::{
    load_theme, toggle_theme, KeyValueStore, KvNoteRepository, Note, NoteId, NotePatch,
    NoteStore, StoreResult, Theme,
};

/// Result of handling one command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Outcome {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

pub struct Session<S: KeyValueStore> {
    store: NoteStore<KvNoteRepository<S>>,
    theme: Theme,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads notes and theme from `kv`.
    ///
    /// # Errors
    /// - Fails when the stored notes cannot be read.
    pub fn open(kv: S) -> StoreResult<Self> {
        let theme = load_theme(&kv);
        Ok(Self {
            store: NoteStore::open(KvNoteRepository::new(kv))?,
            theme,
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &NoteStore<KvNoteRepository<S>> {
        &self.store
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::New => match self.store.create() {
                Ok(id) => Outcome::line(format!("Created note {id}")),
                Err(err) => {
                    // The note exists in memory and is selected even when unsaved.
                    let id = self
                        .store
                        .selected_id()
                        .map(NoteId::to_string)
                        .unwrap_or_default();
                    with_persist_warning(Err(err), format!("Created note {id}"))
                }
            },
            Command::List => Outcome {
                lines: self.list_lines(),
                quit: false,
            },
            Command::Show => Outcome {
                lines: self.show_lines(),
                quit: false,
            },
            Command::Select(raw) => match NoteId::parse(raw) {
                Ok(id) => {
                    let known = self.store.state().contains(&id);
                    self.store.select(id.clone());
                    if known {
                        Outcome::line(format!("Selected note {id}"))
                    } else {
                        Outcome::line(format!("Selected {id}, but no such note exists"))
                    }
                }
                Err(err) => Outcome::line(err.to_string()),
            },
            Command::Title(title) => self.update_current(NotePatch::title(title), "Title saved"),
            Command::Content(content) => {
                self.update_current(NotePatch::content(content), "Content saved")
            }
            Command::Delete(raw) => self.delete(raw),
            Command::Theme => {
                let result = toggle_theme(self.store.repository_mut().store_mut(), self.theme);
                self.theme = self.theme.toggle();
                match result {
                    Ok(_) => Outcome::line(format!("Theme: {}", self.theme)),
                    Err(err) => Outcome::line(format!(
                        "Theme: {} (warning: not saved: {err})",
                        self.theme
                    )),
                }
            }
            Command::Help => Outcome::line(USAGE),
            Command::Quit => Outcome {
                lines: Vec::new(),
                quit: true,
            },
        }
    }

    fn update_current(&mut self, patch: NotePatch, done: &str) -> Outcome {
        let Some(id) = self.store.current_note().map(|note| note.id().clone()) else {
            return Outcome::line(NO_SELECTION);
        };
        let result = self.store.update(&id, patch);
        with_persist_warning(result, done)
    }

    fn delete(&mut self, raw: Option<String>) -> Outcome {
        let id = match raw {
            Some(raw) => match NoteId::parse(raw) {
                Ok(id) => id,
                Err(err) => return Outcome::line(err.to_string()),
            },
            None => match self.store.current_note() {
                Some(note) => note.id().clone(),
                None => return Outcome::line(NO_SELECTION),
            },
        };

        let existed = self.store.state().contains(&id);
        let result = self.store.delete(&id);
        let message = if existed {
            format!("Deleted note {id}")
        } else {
            format!("No note {id}")
        };
        with_persist_warning(result, message)
    }

    fn list_lines(&self) -> Vec<String> {
        if self.store.notes().is_empty() {
            return vec!["No notes yet. Type `new` to create one.".to_string()];
        }

        let selected = self.store.selected_id();
        self.store
            .notes()
            .iter()
            .map(|note| {
                let marker = if Some(note.id()) == selected { '*' } else { ' ' };
                format!(
                    "{marker} {}  {}  {}  {}",
                    note.id(),
                    note.title,
                    preview(&note.content),
                    format_date(note.last_modified)
                )
            })
            .collect()
    }

    fn show_lines(&self) -> Vec<String> {
        let Some(note) = self.store.current_note() else {
            return vec!["Create a new note to get started.".to_string()];
        };
        let mut lines = vec![
            format!("# {}", note.title),
            format!("Last saved {}", format_time(note)),
        ];
        lines.extend(note.content.lines().map(str::to_string));
        lines
    }
}

const NO_SELECTION: &str = "No note selected.";
const PREVIEW_CHARS: usize = 40;

fn with_persist_warning(result: StoreResult<()>, message: impl Into<String>) -> Outcome {
    let mut outcome = Outcome::line(message);
    if let Err(err) = result {
        outcome.lines.push(format!("warning: {err}"));
    }
    outcome
}

/// First line of `content`, truncated for list display.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut preview = first_line.chars().take(PREVIEW_CHARS).collect::<String>();
    if first_line.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn local_time(epoch_ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&Local))
}

fn format_date(epoch_ms: i64) -> String {
    local_time(epoch_ms)
        .map(|time| time.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

fn format_time(note: &Note) -> String {
    local_time(note.last_modified)
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "at an unknown time".to_string())
}
