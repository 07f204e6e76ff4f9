//! Navigation-related controller methods (tabs, entries, overlays, player)

use std::time::Instant;

use crate::model::{Channel, ChannelPlaylist, ContentItem, ListEntry, NowPlaying, OverlayKind, Video};
use super::AppController;

impl AppController {
    /// Resolve tabs and start loading the selected one if it has never loaded
    pub async fn refresh_tabs(&self) {
        let model = self.model.lock().await;
        model.resolve_tabs().await;
        model.appear_selected_tab().await;
    }

    pub async fn handle_selected_entry(&self, entry: ListEntry) {
        match entry {
            ListEntry::Content(item) => self.open_content_item(item).await,
            ListEntry::Document(doc) => {
                tracing::info!(path = %doc.path.display(), "Playing local file");
                let model = self.model.lock().await;
                model
                    .present_player(NowPlaying {
                        title: doc.name,
                        author: "Local file".to_string(),
                        length_seconds: 0,
                        started_at: Instant::now(),
                    })
                    .await;
            }
        }
    }

    pub async fn open_content_item(&self, item: ContentItem) {
        match item {
            ContentItem::Video(video) => self.play_video(&video).await,
            ContentItem::Channel(channel) => self.open_channel(channel).await,
            ContentItem::Playlist(playlist) => self.open_playlist(playlist).await,
        }
    }

    pub async fn play_video(&self, video: &Video) {
        let model = self.model.lock().await;
        model.play_video(video).await;
    }

    pub async fn open_channel(&self, channel: Channel) {
        let model = self.model.lock().await;
        model.present_channel(channel).await;
    }

    pub async fn open_playlist(&self, playlist: ChannelPlaylist) {
        let model = self.model.lock().await;
        model.present_playlist(playlist).await;
    }

    /// Open the channel that published `video`; channel details load on appear
    pub async fn open_channel_of(&self, video: &Video) {
        self.open_channel(Channel {
            id: video.channel_id.clone(),
            name: video.author.clone(),
            subscriber_count: None,
            videos: Vec::new(),
        })
        .await;
    }

    /// Channel of the highlighted entry in the current tab
    pub async fn open_selected_entry_channel(&self) {
        let entry = self.model.lock().await.selected_list_entry().await;
        match entry {
            Some(ListEntry::Content(ContentItem::Video(video))) => self.open_channel_of(&video).await,
            Some(ListEntry::Content(ContentItem::Channel(channel))) => self.open_channel(channel).await,
            Some(ListEntry::Content(ContentItem::Playlist(playlist))) => {
                self.open_channel(Channel {
                    id: playlist.channel_id,
                    name: String::new(),
                    subscriber_count: None,
                    videos: Vec::new(),
                })
                .await
            }
            _ => {}
        }
    }

    pub async fn play_overlay_selection(&self, kind: OverlayKind) {
        let video = self.model.lock().await.selected_overlay_video(kind).await;
        if let Some(video) = video {
            self.play_video(&video).await;
        }
    }

    /// Dismiss the topmost presented layer: player, then channel, then playlist
    pub async fn dismiss_topmost(&self) -> bool {
        let model = self.model.lock().await;
        if model.is_player_presenting().await {
            model.close_player().await;
            return true;
        }
        match model.topmost_overlay().await {
            Some(kind) => {
                model.dismiss_overlay(kind).await;
                true
            }
            None => false,
        }
    }
}
