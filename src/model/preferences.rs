//! User preferences and their persistent store

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::observable::Observable;
use super::types::VisibleSection;

pub const PREFERENCES_FILE: &str = ".cache/preferences.json";

fn default_true() -> bool {
    true
}

fn default_visible_sections() -> BTreeSet<VisibleSection> {
    [
        VisibleSection::Subscriptions,
        VisibleSection::Trending,
        VisibleSection::Playlists,
    ]
    .into_iter()
    .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_true")]
    pub show_home: bool,
    #[serde(default)]
    pub show_documents: bool,
    #[serde(default)]
    pub show_open_actions_toolbar_item: bool,
    /// Stored as a set; display order comes from `TabSelection::ALL`
    #[serde(default = "default_visible_sections")]
    pub visible_sections: BTreeSet<VisibleSection>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_home: true,
            show_documents: false,
            show_open_actions_toolbar_item: false,
            visible_sections: default_visible_sections(),
        }
    }
}

impl Preferences {
    pub fn toggle_section(&mut self, section: VisibleSection) {
        if !self.visible_sections.remove(&section) {
            self.visible_sections.insert(section);
        }
    }
}

/// Observable preferences backed by a JSON file
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Observable<Preferences>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            preferences: Observable::new(preferences),
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let preferences = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "No preferences file, using defaults");
            Preferences::default()
        };
        Ok(Self::new(path, preferences))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Preferences {
        self.preferences.get()
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Preferences),
    {
        self.preferences.update(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.preferences.subscribe()
    }

    pub fn save(&self) -> Result<()> {
        save_preferences(&self.path, &self.get())
    }
}

pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let content = serde_json::to_string_pretty(preferences)?;
    fs::write(path, content)?;
    Ok(())
}
