//! Detail overlay resolution (channel / playlist) and their stacking order

use std::fmt;
use std::time::{Duration, Instant};

use super::types::{Channel, ChannelPlaylist};

/// Main content sits at this depth; overlays go above or below it
pub const MAIN_CONTENT_Z: i32 = 0;

const SUNK_Z: i32 = -1;
const CHANNEL_Z: i32 = 2;
const PLAYLIST_Z: i32 = 1;

const SLIDE_DURATION: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Channel,
    Playlist,
}

impl OverlayKind {
    fn token(self) -> &'static str {
        match self {
            OverlayKind::Channel => "channelVideos",
            OverlayKind::Playlist => "channelPlaylist",
        }
    }
}

/// Stable identity of one presentation of an overlay.
///
/// A new identity is minted every time an overlay goes from hidden to
/// presented, so state tied to the old presentation is never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId {
    pub kind: OverlayKind,
    pub generation: u64,
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.token(), self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Move(Edge),
}

impl Transition {
    /// Rows still to travel `elapsed` after presentation, for an overlay `height` rows tall
    pub fn slide_offset(self, elapsed: Duration, height: u16) -> u16 {
        match self {
            Transition::Move(_) => {
                if elapsed >= SLIDE_DURATION {
                    return 0;
                }
                let remaining = 1.0 - elapsed.as_secs_f64() / SLIDE_DURATION.as_secs_f64();
                (remaining * height as f64).round() as u16
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayDescriptor {
    pub id: OverlayId,
    pub z_index: i32,
    pub transition: Transition,
    pub presented_at: Instant,
}

impl OverlayDescriptor {
    pub fn kind(&self) -> OverlayKind {
        self.id.kind
    }

    pub fn is_below_content(&self) -> bool {
        self.z_index < MAIN_CONTENT_Z
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Presentation {
    generation: u64,
    presented_at: Instant,
}

/// Transient navigation flags for the detail overlays
#[derive(Clone, Debug, Default)]
pub struct NavigationIntent {
    channel: Option<Presentation>,
    playlist: Option<Presentation>,
    channel_generation: u64,
    playlist_generation: u64,
    pub channel_target: Option<Channel>,
    pub playlist_target: Option<ChannelPlaylist>,
}

impl NavigationIntent {
    pub fn presenting_channel(&self) -> bool {
        self.channel.is_some()
    }

    pub fn presenting_playlist(&self) -> bool {
        self.playlist.is_some()
    }

    /// Present the channel overlay. Returns the identity of the presentation;
    /// re-presenting while already visible keeps the current identity.
    pub fn present_channel(&mut self, channel: Channel) -> OverlayId {
        self.channel_target = Some(channel);
        let presentation = match self.channel {
            Some(p) => p,
            None => {
                self.channel_generation += 1;
                let p = Presentation {
                    generation: self.channel_generation,
                    presented_at: Instant::now(),
                };
                self.channel = Some(p);
                p
            }
        };
        OverlayId {
            kind: OverlayKind::Channel,
            generation: presentation.generation,
        }
    }

    pub fn present_playlist(&mut self, playlist: ChannelPlaylist) -> OverlayId {
        self.playlist_target = Some(playlist);
        let presentation = match self.playlist {
            Some(p) => p,
            None => {
                self.playlist_generation += 1;
                let p = Presentation {
                    generation: self.playlist_generation,
                    presented_at: Instant::now(),
                };
                self.playlist = Some(p);
                p
            }
        };
        OverlayId {
            kind: OverlayKind::Playlist,
            generation: presentation.generation,
        }
    }

    pub fn dismiss(&mut self, kind: OverlayKind) {
        match kind {
            OverlayKind::Channel => self.channel = None,
            OverlayKind::Playlist => self.playlist = None,
        }
    }

    pub fn current_id(&self, kind: OverlayKind) -> Option<OverlayId> {
        let presentation = match kind {
            OverlayKind::Channel => self.channel,
            OverlayKind::Playlist => self.playlist,
        };
        presentation.map(|p| OverlayId {
            kind,
            generation: p.generation,
        })
    }
}

/// Resolve presented overlays, sorted bottom-most first.
pub fn resolve_overlays(intent: &NavigationIntent, player_active: bool) -> Vec<OverlayDescriptor> {
    let depth = |z: i32| if player_active { SUNK_Z } else { z };

    // Playlist first so that on equal depth the channel still draws last
    let mut overlays: Vec<OverlayDescriptor> = [
        (OverlayKind::Playlist, intent.playlist, PLAYLIST_Z),
        (OverlayKind::Channel, intent.channel, CHANNEL_Z),
    ]
    .into_iter()
    .filter_map(|(kind, presentation, z)| {
        presentation.map(|p| OverlayDescriptor {
            id: OverlayId {
                kind,
                generation: p.generation,
            },
            z_index: depth(z),
            transition: Transition::Move(Edge::Bottom),
            presented_at: p.presented_at,
        })
    })
    .collect();

    overlays.sort_by_key(|o| o.z_index);
    overlays
}

/// The overlay the user is interacting with, if any sits above main content
pub fn topmost(overlays: &[OverlayDescriptor]) -> Option<&OverlayDescriptor> {
    overlays.iter().rev().find(|o| !o.is_below_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel {
            id: "UC1".into(),
            name: "Channel".into(),
            subscriber_count: None,
            videos: vec![],
        }
    }

    fn playlist() -> ChannelPlaylist {
        ChannelPlaylist {
            id: "PL1".into(),
            title: "Playlist".into(),
            channel_id: "UC1".into(),
            videos: vec![],
        }
    }

    fn z_of(overlays: &[OverlayDescriptor], kind: OverlayKind) -> i32 {
        overlays.iter().find(|o| o.kind() == kind).unwrap().z_index
    }

    #[test]
    fn test_nothing_presented() {
        assert!(resolve_overlays(&NavigationIntent::default(), false).is_empty());
        assert!(resolve_overlays(&NavigationIntent::default(), true).is_empty());
    }

    #[test]
    fn test_channel_stacks_above_playlist() {
        let mut intent = NavigationIntent::default();
        intent.present_channel(channel());
        intent.present_playlist(playlist());

        let overlays = resolve_overlays(&intent, false);
        assert_eq!(z_of(&overlays, OverlayKind::Channel), 2);
        assert_eq!(z_of(&overlays, OverlayKind::Playlist), 1);
        assert_eq!(overlays.last().unwrap().kind(), OverlayKind::Channel);
        assert_eq!(topmost(&overlays).unwrap().kind(), OverlayKind::Channel);
    }

    #[test]
    fn test_player_sinks_both_overlays() {
        let mut intent = NavigationIntent::default();
        intent.present_channel(channel());
        intent.present_playlist(playlist());

        let overlays = resolve_overlays(&intent, true);
        assert_eq!(overlays.len(), 2);
        assert!(overlays.iter().all(|o| o.z_index == -1));
        assert!(topmost(&overlays).is_none());
    }

    #[test]
    fn test_single_overlay_depths() {
        let mut intent = NavigationIntent::default();
        intent.present_playlist(playlist());
        let overlays = resolve_overlays(&intent, false);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].z_index, 1);
        assert_eq!(overlays[0].transition, Transition::Move(Edge::Bottom));
    }

    #[test]
    fn test_representing_playlist_mints_fresh_identity() {
        let mut intent = NavigationIntent::default();
        let first = intent.present_playlist(playlist());
        assert_eq!(intent.present_playlist(playlist()), first);

        intent.dismiss(OverlayKind::Playlist);
        assert!(intent.current_id(OverlayKind::Playlist).is_none());

        let second = intent.present_playlist(playlist());
        assert_ne!(first, second);
        assert_eq!(second.to_string(), "channelPlaylist#2");
    }

    #[test]
    fn test_identities_distinct_per_kind() {
        let mut intent = NavigationIntent::default();
        let channel_id = intent.present_channel(channel());
        let playlist_id = intent.present_playlist(playlist());
        assert_ne!(channel_id, playlist_id);
        assert_eq!(channel_id.to_string(), "channelVideos#1");
    }

    #[test]
    fn test_slide_offset() {
        let transition = Transition::Move(Edge::Bottom);
        assert_eq!(transition.slide_offset(Duration::ZERO, 20), 20);
        assert_eq!(transition.slide_offset(Duration::from_millis(75), 20), 10);
        assert_eq!(transition.slide_offset(Duration::from_millis(500), 20), 0);
    }
}
