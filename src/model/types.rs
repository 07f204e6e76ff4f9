//! Core type definitions for the application

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level tab of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabSelection {
    Home,
    Documents,
    Subscriptions,
    Popular,
    Trending,
    Playlists,
    Search,
}

impl TabSelection {
    /// Canonical display order of the tab strip
    pub const ALL: [TabSelection; 7] = [
        TabSelection::Home,
        TabSelection::Documents,
        TabSelection::Subscriptions,
        TabSelection::Popular,
        TabSelection::Trending,
        TabSelection::Playlists,
        TabSelection::Search,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Documents => "Documents",
            Self::Subscriptions => "Subscriptions",
            Self::Popular => "Popular",
            Self::Trending => "Trending",
            Self::Playlists => "Playlists",
            Self::Search => "Search",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Home => "⌂",
            Self::Documents => "▤",
            Self::Subscriptions => "★",
            Self::Popular => "↗",
            Self::Trending => "▮",
            Self::Playlists => "☰",
            Self::Search => "⌕",
        }
    }
}

/// A section the user can enable in preferences
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibleSection {
    Home,
    Documents,
    Subscriptions,
    Popular,
    Trending,
    Playlists,
    Search,
}

impl VisibleSection {
    pub const ALL: [VisibleSection; 7] = [
        VisibleSection::Home,
        VisibleSection::Documents,
        VisibleSection::Subscriptions,
        VisibleSection::Popular,
        VisibleSection::Trending,
        VisibleSection::Playlists,
        VisibleSection::Search,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Documents => "Documents",
            Self::Subscriptions => "Subscriptions",
            Self::Popular => "Popular",
            Self::Trending => "Trending",
            Self::Playlists => "Playlists",
            Self::Search => "Search",
        }
    }
}

/// Backing service an account is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKind {
    Invidious,
    Piped,
    Local,
}

impl ServiceKind {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Invidious => Capabilities {
                supports_subscriptions: true,
                supports_user_playlists: true,
                supports_popular: true,
            },
            Self::Piped => Capabilities {
                supports_subscriptions: true,
                supports_user_playlists: false,
                supports_popular: false,
            },
            Self::Local => Capabilities::default(),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invidious => write!(f, "Invidious"),
            Self::Piped => write!(f, "Piped"),
            Self::Local => write!(f, "Local"),
        }
    }
}

/// Feature flags of the active service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub supports_subscriptions: bool,
    pub supports_user_playlists: bool,
    pub supports_popular: bool,
}

/// A signed-in or anonymous identity bound to a service instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub service: ServiceKind,
    pub instance_url: String,
    #[serde(default)]
    pub anonymous: bool,
    /// Overrides the capabilities implied by `service`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
}

impl Account {
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities.unwrap_or_else(|| self.service.capabilities())
    }
}

/// A single video entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub author: String,
    pub channel_id: String,
    pub length_seconds: u32,
    #[serde(default)]
    pub views: u64,
    pub published: DateTime<Utc>,
}

/// Channel detail data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subscriber_count: Option<u64>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

impl Channel {
    /// Abbreviated subscriber count, e.g. `1.2M`
    pub fn subscriptions_string(&self) -> Option<String> {
        self.subscriber_count.map(abbreviate_count)
    }
}

/// A playlist published by a channel or owned by a user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPlaylist {
    pub id: String,
    pub title: String,
    pub channel_id: String,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// Anything that can be listed, opened or shared
#[derive(Clone, Debug, PartialEq)]
pub enum ContentItem {
    Video(Video),
    Channel(Channel),
    Playlist(ChannelPlaylist),
}

impl ContentItem {
    pub fn title(&self) -> &str {
        match self {
            ContentItem::Video(video) => &video.title,
            ContentItem::Channel(channel) => &channel.name,
            ContentItem::Playlist(playlist) => &playlist.title,
        }
    }
}

pub fn abbreviate_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format_scaled(count as f64 / 1_000.0, "K"),
        1_000_000..=999_999_999 => format_scaled(count as f64 / 1_000_000.0, "M"),
        _ => format_scaled(count as f64 / 1_000_000_000.0, "B"),
    }
}

fn format_scaled(value: f64, suffix: &str) -> String {
    if value >= 100.0 || value.fract() < 0.05 {
        format!("{:.0}{}", value.floor(), suffix)
    } else {
        format!("{:.1}{}", value, suffix)
    }
}
