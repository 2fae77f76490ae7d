use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::render::SortMode;
use crate::storage::{keys, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar display settings kept next to the data.
pub struct Preferences<S> {
    storage: S,
}

impl<S: Storage> Preferences<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn theme(&self) -> Result<Theme> {
        Ok(match self.storage.get(keys::THEME)?.as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        })
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.set(keys::THEME, theme.as_str())
    }

    /// Unknown stored values read as "no sort".
    pub fn sort_mode(&self) -> Result<Option<SortMode>> {
        Ok(self
            .storage
            .get(keys::SORT_MODE)?
            .and_then(|raw| raw.parse().ok()))
    }

    pub fn set_sort_mode(&self, mode: Option<SortMode>) -> Result<()> {
        match mode {
            Some(mode) => self.storage.set(keys::SORT_MODE, mode.as_str()),
            None => self.storage.remove(keys::SORT_MODE).map(|_| ()),
        }
    }
}
