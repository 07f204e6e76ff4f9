//! Video catalog backend: the `VideosApi` seam and an in-memory implementation

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Account, Channel, ChannelPlaylist, ContentItem, Video};

pub const FEED_LIMIT: usize = 40;
const TRENDING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{0} is not supported by this service")]
    Unsupported(&'static str),
}

#[async_trait]
pub trait VideosApi: Send + Sync {
    async fn video(&self, id: &str) -> Result<Video>;
    async fn channel(&self, id: &str) -> Result<Channel>;
    async fn channel_playlist(&self, id: &str) -> Result<ChannelPlaylist>;
    async fn home(&self) -> Result<Vec<Video>>;
    async fn popular(&self) -> Result<Vec<Video>>;
    async fn trending(&self) -> Result<Vec<Video>>;
    async fn subscription_feed(&self, channel_ids: &[String]) -> Result<Vec<Video>>;
    async fn user_playlists(&self, account: &Account) -> Result<Vec<ChannelPlaylist>>;
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>>;
}

/// On-disk catalog layout
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub playlists: Vec<ChannelPlaylist>,
    /// Playlist ids owned by each account id
    #[serde(default)]
    pub user_playlists: BTreeMap<String, Vec<String>>,
}

#[derive(Clone)]
pub struct LocalCatalog {
    data: Arc<CatalogData>,
}

impl LocalCatalog {
    pub fn new(data: CatalogData) -> Self {
        Self { data: Arc::new(data) }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading catalog from {}", path.display()))?;
        let data: CatalogData = serde_json::from_str(&content)
            .with_context(|| format!("parsing catalog from {}", path.display()))?;
        tracing::info!(
            channels = data.channels.len(),
            playlists = data.playlists.len(),
            "Catalog loaded"
        );
        Ok(Self::new(data))
    }

    fn all_videos(&self) -> Vec<Video> {
        self.data
            .channels
            .iter()
            .flat_map(|c| c.videos.iter().cloned())
            .collect()
    }

    fn newest_first(mut videos: Vec<Video>) -> Vec<Video> {
        videos.sort_by(|a, b| b.published.cmp(&a.published));
        videos.truncate(FEED_LIMIT);
        videos
    }
}

#[async_trait]
impl VideosApi for LocalCatalog {
    async fn video(&self, id: &str) -> Result<Video> {
        let video = self
            .all_videos()
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| CatalogError::NotFound { kind: "video", id: id.to_string() })?;
        Ok(video)
    }

    async fn channel(&self, id: &str) -> Result<Channel> {
        let channel = self
            .data
            .channels
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { kind: "channel", id: id.to_string() })?;
        Ok(channel)
    }

    async fn channel_playlist(&self, id: &str) -> Result<ChannelPlaylist> {
        let playlist = self
            .data
            .playlists
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { kind: "playlist", id: id.to_string() })?;
        Ok(playlist)
    }

    async fn home(&self) -> Result<Vec<Video>> {
        Ok(Self::newest_first(self.all_videos()))
    }

    async fn popular(&self) -> Result<Vec<Video>> {
        let mut videos = self.all_videos();
        videos.sort_by(|a, b| b.views.cmp(&a.views));
        videos.truncate(FEED_LIMIT);
        Ok(videos)
    }

    async fn trending(&self) -> Result<Vec<Video>> {
        let videos = self.all_videos();
        let Some(newest) = videos.iter().map(|v| v.published).max() else {
            return Ok(Vec::new());
        };
        let cutoff = newest - Duration::days(TRENDING_WINDOW_DAYS);
        let mut recent: Vec<Video> = videos.into_iter().filter(|v| v.published >= cutoff).collect();
        recent.sort_by(|a, b| b.views.cmp(&a.views));
        recent.truncate(FEED_LIMIT);
        Ok(recent)
    }

    async fn subscription_feed(&self, channel_ids: &[String]) -> Result<Vec<Video>> {
        let videos = self
            .data
            .channels
            .iter()
            .filter(|c| channel_ids.contains(&c.id))
            .flat_map(|c| c.videos.iter().cloned())
            .collect();
        Ok(Self::newest_first(videos))
    }

    async fn user_playlists(&self, account: &Account) -> Result<Vec<ChannelPlaylist>> {
        if !account.capabilities().supports_user_playlists {
            return Err(CatalogError::Unsupported("user playlists").into());
        }
        let ids = self.data.user_playlists.get(&account.id).cloned().unwrap_or_default();
        Ok(self
            .data
            .playlists
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<ContentItem>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<ContentItem> = self
            .data
            .channels
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .map(ContentItem::Channel)
            .collect();
        results.extend(
            self.data
                .playlists
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&needle))
                .cloned()
                .map(ContentItem::Playlist),
        );
        results.extend(
            self.all_videos()
                .into_iter()
                .filter(|v| v.title.to_lowercase().contains(&needle) || v.author.to_lowercase().contains(&needle))
                .map(ContentItem::Video),
        );
        results.truncate(FEED_LIMIT);
        Ok(results)
    }
}

/// Built-in catalog used when no fixture file is configured
pub fn demo_catalog() -> CatalogData {
    let base = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).single().unwrap_or_else(Utc::now);

    let video = |id: &str, title: &str, author: &str, channel_id: &str, minutes: u32, views: u64, days_ago: i64| Video {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        channel_id: channel_id.to_string(),
        length_seconds: minutes * 60 + 17,
        views,
        published: base - Duration::days(days_ago),
    };

    let rust_videos = vec![
        video("rv1", "Ownership in ten minutes", "Rustacean Station", "UCrust", 10, 182_000, 1),
        video("rv2", "Async traits, finally", "Rustacean Station", "UCrust", 24, 96_500, 3),
        video("rv3", "Writing a terminal UI", "Rustacean Station", "UCrust", 41, 310_200, 12),
        video("rv4", "Error handling patterns", "Rustacean Station", "UCrust", 18, 54_000, 30),
    ];
    let cooking_videos = vec![
        video("cv1", "Perfect sourdough at home", "Slow Kitchen", "UCcook", 15, 1_240_000, 2),
        video("cv2", "Five sauces everyone should know", "Slow Kitchen", "UCcook", 22, 870_000, 6),
        video("cv3", "Knife skills basics", "Slow Kitchen", "UCcook", 9, 2_100_000, 45),
    ];
    let space_videos = vec![
        video("sv1", "Launch recap: week 20", "Orbit Weekly", "UCspace", 12, 430_000, 0),
        video("sv2", "How ion engines work", "Orbit Weekly", "UCspace", 19, 3_400_000, 20),
    ];

    let playlists = vec![
        ChannelPlaylist {
            id: "PLrust-basics".to_string(),
            title: "Rust basics".to_string(),
            channel_id: "UCrust".to_string(),
            videos: vec![rust_videos[0].clone(), rust_videos[3].clone()],
        },
        ChannelPlaylist {
            id: "PLweeknight".to_string(),
            title: "Weeknight dinners".to_string(),
            channel_id: "UCcook".to_string(),
            videos: cooking_videos[..2].to_vec(),
        },
        ChannelPlaylist {
            id: "PLwatch-later".to_string(),
            title: "Watch later".to_string(),
            channel_id: "UCrust".to_string(),
            videos: vec![space_videos[1].clone(), rust_videos[2].clone()],
        },
    ];

    let mut user_playlists = BTreeMap::new();
    user_playlists.insert("invidious-demo".to_string(), vec!["PLwatch-later".to_string()]);

    CatalogData {
        channels: vec![
            Channel {
                id: "UCrust".to_string(),
                name: "Rustacean Station".to_string(),
                subscriber_count: Some(48_300),
                videos: rust_videos,
            },
            Channel {
                id: "UCcook".to_string(),
                name: "Slow Kitchen".to_string(),
                subscriber_count: Some(2_450_000),
                videos: cooking_videos,
            },
            Channel {
                id: "UCspace".to_string(),
                name: "Orbit Weekly".to_string(),
                subscriber_count: Some(910_000),
                videos: space_videos,
            },
        ],
        playlists,
        user_playlists,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::accounts::demo_accounts;

    fn catalog() -> LocalCatalog {
        LocalCatalog::new(demo_catalog())
    }

    #[tokio::test]
    async fn test_channel_lookup() {
        let channel = catalog().channel("UCcook").await.unwrap();
        assert_eq!(channel.name, "Slow Kitchen");

        let err = catalog().channel("UCnone").await.unwrap_err();
        assert_eq!(err.to_string(), "channel 'UCnone' not found");

        assert_eq!(catalog().video("sv2").await.unwrap().author, "Orbit Weekly");
    }

    #[tokio::test]
    async fn test_home_is_newest_first() {
        let home = catalog().home().await.unwrap();
        assert_eq!(home[0].id, "sv1");
        assert!(home.windows(2).all(|w| w[0].published >= w[1].published));
    }

    #[tokio::test]
    async fn test_trending_only_recent() {
        let trending = catalog().trending().await.unwrap();
        assert!(trending.iter().all(|v| v.id != "cv3" && v.id != "rv4"));
        assert_eq!(trending[0].id, "cv1");
    }

    #[tokio::test]
    async fn test_subscription_feed_filters_channels() {
        let feed = catalog().subscription_feed(&["UCspace".to_string()]).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|v| v.channel_id == "UCspace"));
    }

    #[tokio::test]
    async fn test_user_playlists_require_capability() {
        let accounts = demo_accounts();
        let playlists = catalog().user_playlists(&accounts[0]).await.unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].id, "PLwatch-later");

        assert!(catalog().user_playlists(&accounts[1]).await.is_err());
    }

    #[tokio::test]
    async fn test_search_matches_channels_and_videos() {
        let results = catalog().search("rust").await.unwrap();
        assert!(matches!(results[0], ContentItem::Channel(ref c) if c.id == "UCrust"));
        assert!(results.iter().any(|r| matches!(r, ContentItem::Playlist(p) if p.id == "PLrust-basics")));
        assert!(catalog().search("   ").await.unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, serde_json::to_string(&demo_catalog()).unwrap()).unwrap();
        let catalog = LocalCatalog::load(&path).unwrap();
        assert_eq!(catalog.data.channels.len(), 3);
    }
}
