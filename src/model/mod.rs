//! Model module - Application state and data types
//!
//! Organized into submodules by responsibility:
//!
//! - `types`: Core domain types (tabs, accounts, videos, channels)
//! - `tabs` / `overlays` / `toolbar`: Pure resolvers for what the UI shows
//! - `resource` / `observable`: Loadable and observable state
//! - `accounts` / `preferences` / `subscriptions`: Persistent user state
//! - `catalog` / `documents`: Content sources
//! - `app_model`: Main application model with state management methods

mod accounts;
mod app_model;
mod catalog;
mod documents;
mod observable;
mod overlays;
mod preferences;
mod resource;
mod share;
mod subscriptions;
mod tabs;
mod toolbar;
mod types;
mod ui_state;

pub use types::{Channel, ChannelPlaylist, ContentItem, TabSelection, Video, abbreviate_count};

pub use accounts::AccountsModel;
pub use catalog::{CatalogError, LocalCatalog, VideosApi, demo_catalog};
pub use overlays::{MAIN_CONTENT_Z, OverlayKind};
pub use preferences::{PREFERENCES_FILE, PreferenceStore, Preferences};
pub use resource::LoadState;
pub use subscriptions::{SUBSCRIPTIONS_CACHE_FILE, SubscribedChannels, SubscriptionService};
pub use toolbar::{Placement, ToolbarAction, ToolbarItem};
pub use ui_state::{ListEntry, Modal, NowPlaying, PlayerState, SettingsRow, UiState};

pub use app_model::{AppModel, OverlayView, TabView};

#[cfg(test)]
pub(crate) use app_model::tests as app_model_tests;
