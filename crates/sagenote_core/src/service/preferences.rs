//! Display-mode preference.
//!
//! # Responsibility
//! - Model the light/dark toggle and persist it under its own key.
//!
//! # Invariants
//! - Missing or unrecognised stored values read as `Theme::Light`.

use crate::repo::kv_repo::{KeyValueStore, StorageResult};
use log::warn;
use std::fmt::{Display, Formatter};

/// Key of the entry holding the display mode.
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the stored theme, falling back to light.
pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    match store.get(THEME_STORAGE_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
            warn!("event=theme_load module=preferences status=error error_code=unknown_value");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!("event=theme_load module=preferences status=error error_code=read_failed error={err}");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &mut impl KeyValueStore, theme: Theme) -> StorageResult<()> {
    store.set(THEME_STORAGE_KEY, theme.as_str())
}

/// Saves the opposite of `current` and returns it.
///
/// `current` is the mode on screen, which may differ from the stored one
/// after an earlier failed save.
pub fn toggle_theme(store: &mut impl KeyValueStore, current: Theme) -> StorageResult<Theme> {
    let next = current.toggle();
    save_theme(store, next)?;
    Ok(next)
}
