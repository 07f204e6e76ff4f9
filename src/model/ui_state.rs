//! UI state: selection, popups, player and list entries

use std::time::Instant;

use super::documents::DocumentEntry;
use super::tabs::TabSelectionBinding;
use super::types::{Channel, ContentItem, Video};

/// A row in a tab's list
#[derive(Clone, Debug, PartialEq)]
pub enum ListEntry {
    Content(ContentItem),
    Document(DocumentEntry),
}

impl ListEntry {
    pub fn videos(videos: Vec<Video>) -> Vec<ListEntry> {
        videos.into_iter().map(|v| ListEntry::Content(ContentItem::Video(v))).collect()
    }

    pub fn title(&self) -> &str {
        match self {
            ListEntry::Content(item) => item.title(),
            ListEntry::Document(doc) => &doc.name,
        }
    }
}

/// Rows of the settings popup, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    ShowHome,
    ShowDocuments,
    ShowOpenActions,
    Section(super::types::VisibleSection),
}

impl SettingsRow {
    pub fn all() -> Vec<SettingsRow> {
        let mut rows = vec![SettingsRow::ShowHome, SettingsRow::ShowDocuments, SettingsRow::ShowOpenActions];
        rows.extend(super::types::VisibleSection::ALL.into_iter().map(SettingsRow::Section));
        rows
    }
}

/// At most one modal popup is shown at a time
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Modal {
    #[default]
    None,
    Help,
    Settings { selected: usize },
    Share { title: String, url: String },
    UnsubscribeAlert { channel: Channel },
    OpenVideos { input: String },
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub tab: TabSelectionBinding,
    pub list_selected: usize,
    pub search_query: String,
    pub search_editing: bool,
    pub modal: Modal,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TabSelectionBinding::default(),
            list_selected: 0,
            search_query: String::new(),
            search_editing: false,
            modal: Modal::None,
            error_message: None,
            error_timestamp: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub author: String,
    pub length_seconds: u32,
    pub started_at: Instant,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub presenting_player: bool,
    pub now_playing: Option<NowPlaying>,
}

impl PlayerState {
    /// The controls bar stands in for the player while it is closed
    pub fn shows_controls_bar(&self) -> bool {
        self.now_playing.is_some() && !self.presenting_player
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.now_playing
            .as_ref()
            .map(|n| (n.started_at.elapsed().as_secs() as u32).min(n.length_seconds))
            .unwrap_or(0)
    }
}
