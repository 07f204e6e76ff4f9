//! Main application model with state management

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::{Mutex, watch};

use crate::config::AppConfig;

use super::accounts::{AccountProvider, AccountsModel};
use super::catalog::VideosApi;
use super::documents::list_documents;
use super::observable::Observable;
use super::overlays::{NavigationIntent, OverlayDescriptor, OverlayId, OverlayKind, resolve_overlays, topmost};
use super::preferences::PreferenceStore;
use super::resource::{LoadState, Resource};
use super::share::{InstanceLinks, ShareLinkProvider};
use super::subscriptions::{SubscribedChannels, SubscriptionService};
use super::tabs::{TabInputs, TabList, TabVisibilityResolver};
use super::toolbar::{OverlayChrome, ToolbarItem, overlay_chrome, tab_toolbar};
use super::types::{Account, Channel, ChannelPlaylist, ContentItem, TabSelection, Video};
use super::ui_state::{ListEntry, Modal, NowPlaying, PlayerState, SettingsRow, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Per-presentation state of a detail overlay
pub struct OverlayStore<T> {
    pub id: OverlayId,
    pub resource: Resource<T>,
    pub selected: usize,
}

#[derive(Default)]
struct NavigationState {
    intent: NavigationIntent,
    channel: Option<OverlayStore<Channel>>,
    playlist: Option<OverlayStore<ChannelPlaylist>>,
}

/// Snapshot of the tab strip and the selected tab's content
#[derive(Clone, Debug)]
pub struct TabView {
    pub tabs: TabList,
    pub selected: TabSelection,
    pub toolbar: Vec<ToolbarItem>,
    pub content: LoadState<Vec<ListEntry>>,
    pub list_selected: usize,
    pub search_query: String,
    pub search_editing: bool,
    pub account: Option<Account>,
}

/// Snapshot of one presented overlay
#[derive(Clone, Debug)]
pub struct OverlayView {
    pub descriptor: OverlayDescriptor,
    pub title: String,
    /// `None` while the channel is still loading
    pub subscribers: Option<String>,
    pub videos: LoadState<Vec<Video>>,
    pub selected: usize,
    pub chrome: OverlayChrome,
    pub subscribed: bool,
}

pub struct AppModel {
    config: AppConfig,
    pub accounts: Arc<AccountsModel>,
    pub preferences: Arc<PreferenceStore>,
    api: Arc<dyn VideosApi>,
    pub subscriptions: SubscribedChannels,
    pub ui_state: Arc<Mutex<UiState>>,
    navigation: Arc<Mutex<NavigationState>>,
    player: Arc<Mutex<PlayerState>>,
    tab_resolver: Arc<Mutex<TabVisibilityResolver>>,
    tab_resources: Arc<Mutex<HashMap<TabSelection, Resource<Vec<ListEntry>>>>>,
    account_changes: Arc<Mutex<watch::Receiver<Option<Account>>>>,
    sidebar_section_changed: Arc<Observable<bool>>,
    sidebar_changes: Arc<Mutex<watch::Receiver<bool>>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(
        config: AppConfig,
        accounts: Arc<AccountsModel>,
        preferences: Arc<PreferenceStore>,
        api: Arc<dyn VideosApi>,
        subscriptions: SubscribedChannels,
    ) -> Self {
        let account_changes = accounts.subscribe();
        let sidebar_section_changed = Arc::new(Observable::new(false));
        let sidebar_changes = sidebar_section_changed.subscribe();
        Self {
            config,
            accounts,
            preferences,
            api,
            subscriptions,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            navigation: Arc::new(Mutex::new(NavigationState::default())),
            player: Arc::new(Mutex::new(PlayerState::default())),
            tab_resolver: Arc::new(Mutex::new(TabVisibilityResolver::new())),
            tab_resources: Arc::new(Mutex::new(HashMap::new())),
            account_changes: Arc::new(Mutex::new(account_changes)),
            sidebar_section_changed,
            sidebar_changes: Arc::new(Mutex::new(sidebar_changes)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn api(&self) -> Arc<dyn VideosApi> {
        self.api.clone()
    }

    // ========================================================================
    // Account scope
    // ========================================================================

    /// React to an account switch: everything computed for the previous
    /// account is discarded, even if the new account resolves identically.
    pub async fn sync_account_scope(&self) {
        let changed = {
            let mut rx = self.account_changes.lock().await;
            let changed = rx.has_changed().unwrap_or(false);
            if changed {
                rx.borrow_and_update();
            }
            changed
        };
        if !changed {
            return;
        }

        let account_id = self.accounts.current_id();
        tracing::info!(account = account_id.as_deref().unwrap_or("-"), "Account changed, resetting tabs");
        self.tab_resolver.lock().await.invalidate();
        self.tab_resources.lock().await.clear();
        self.subscriptions.set_account(account_id).await;
        self.ui_state.lock().await.list_selected = 0;
    }

    /// Drop the subscriptions feed after a subscribe/unsubscribe went through
    async fn sync_sidebar_changes(&self) {
        let changed = {
            let mut rx = self.sidebar_changes.lock().await;
            let changed = rx.has_changed().unwrap_or(false);
            if changed {
                rx.borrow_and_update();
            }
            changed
        };
        if changed {
            self.tab_resources.lock().await.remove(&TabSelection::Subscriptions);
        }
    }

    pub fn sidebar_section_changed(&self) -> Arc<Observable<bool>> {
        self.sidebar_section_changed.clone()
    }

    pub async fn switch_to_next_account(&self) -> Option<Account> {
        let account = self.accounts.switch_to_next();
        self.sync_account_scope().await;
        account
    }

    pub fn can_toggle_subscription(&self) -> bool {
        self.accounts.capabilities().supports_subscriptions && self.accounts.signed_in()
    }

    // ========================================================================
    // Tabs
    // ========================================================================

    pub async fn resolve_tabs(&self) -> TabList {
        self.sync_account_scope().await;
        self.sync_sidebar_changes().await;

        let preferences = self.preferences.get();
        let inputs = TabInputs::gather(&preferences, &*self.accounts);
        let account_id = self.accounts.current_id();
        let tabs = self.tab_resolver.lock().await.resolve(account_id.as_deref(), inputs);

        let mut ui = self.ui_state.lock().await;
        if ui.tab.reconcile(&tabs) {
            ui.list_selected = 0;
            ui.search_editing = false;
        }
        tabs
    }

    pub async fn selected_tab(&self) -> TabSelection {
        self.ui_state.lock().await.tab.get()
    }

    pub async fn select_tab(&self, tab: TabSelection) -> bool {
        let tabs = self.resolve_tabs().await;
        let mut ui = self.ui_state.lock().await;
        let previous = ui.tab.get();
        let selected = ui.tab.select(tab, &tabs);
        if selected && previous != tab {
            ui.list_selected = 0;
            ui.search_editing = false;
        }
        selected
    }

    /// Select the tab at `index` in the visible strip
    pub async fn select_tab_at(&self, index: usize) -> bool {
        let tabs = self.resolve_tabs().await;
        match tabs.tabs.get(index) {
            Some(tab) => self.select_tab(tab.selection).await,
            None => false,
        }
    }

    pub async fn cycle_tab_forward(&self) {
        let tabs = self.resolve_tabs().await;
        let mut ui = self.ui_state.lock().await;
        ui.tab.select_next(&tabs);
        ui.list_selected = 0;
        ui.search_editing = false;
    }

    pub async fn cycle_tab_backward(&self) {
        let tabs = self.resolve_tabs().await;
        let mut ui = self.ui_state.lock().await;
        ui.tab.select_previous(&tabs);
        ui.list_selected = 0;
        ui.search_editing = false;
    }

    fn tab_resource(&self, tab: TabSelection, query: String) -> Resource<Vec<ListEntry>> {
        let api = self.api.clone();
        let account = self.accounts.current();
        let subscriptions = self.subscriptions.clone();
        let documents_dir = self.config.documents_dir.clone();
        let key = format!("tab:{:?}", tab);

        Resource::new(key, move || {
            let api = api.clone();
            let account = account.clone();
            let subscriptions = subscriptions.clone();
            let documents_dir = documents_dir.clone();
            let query = query.clone();
            async move {
                let entries = match tab {
                    TabSelection::Home => ListEntry::videos(api.home().await?),
                    TabSelection::Documents => list_documents(&documents_dir)?
                        .into_iter()
                        .map(ListEntry::Document)
                        .collect(),
                    TabSelection::Subscriptions => {
                        let ids = subscriptions.channel_ids().await;
                        ListEntry::videos(api.subscription_feed(&ids).await?)
                    }
                    TabSelection::Popular => ListEntry::videos(api.popular().await?),
                    TabSelection::Trending => ListEntry::videos(api.trending().await?),
                    TabSelection::Playlists => match &account {
                        Some(account) => api
                            .user_playlists(account)
                            .await?
                            .into_iter()
                            .map(|p| ListEntry::Content(ContentItem::Playlist(p)))
                            .collect(),
                        None => Vec::new(),
                    },
                    TabSelection::Search => api
                        .search(&query)
                        .await?
                        .into_iter()
                        .map(ListEntry::Content)
                        .collect(),
                };
                Ok(entries)
            }
            .boxed()
        })
    }

    /// Make sure the selected tab has content, loading it the first time it appears
    pub async fn appear_selected_tab(&self) {
        let tabs = self.resolve_tabs().await;
        let (tab, query) = {
            let ui = self.ui_state.lock().await;
            (ui.tab.get(), ui.search_query.clone())
        };
        if !tabs.contains(tab) {
            return;
        }
        let mut resources = self.tab_resources.lock().await;
        let resource = resources
            .entry(tab)
            .or_insert_with(|| self.tab_resource(tab, query));
        if matches!(resource.state(), LoadState::Idle) {
            resource.load_if_needed();
        }
    }

    /// Reload the selected tab unconditionally
    pub async fn reload_selected_tab(&self) {
        let tab = self.selected_tab().await;
        if !self.resolve_tabs().await.contains(tab) {
            return;
        }
        if let Some(resource) = self.tab_resources.lock().await.get(&tab) {
            resource.load();
        }
    }

    pub async fn get_tab_view(&self) -> TabView {
        let tabs = self.resolve_tabs().await;
        let preferences = self.preferences.get();
        let ui = self.ui_state.lock().await.clone();
        let selected = ui.tab.get();
        let content = if tabs.contains(selected) {
            self.tab_resources
                .lock()
                .await
                .get(&selected)
                .map(|r| r.state())
                .unwrap_or_default()
        } else {
            LoadState::Idle
        };

        TabView {
            toolbar: tab_toolbar(self.config.platform, &preferences, selected),
            tabs,
            selected,
            content,
            list_selected: ui.list_selected,
            search_query: ui.search_query,
            search_editing: ui.search_editing,
            account: self.accounts.current(),
        }
    }

    /// Entries of the selected tab, empty while that tab is hidden
    async fn selected_tab_entries(&self) -> Vec<ListEntry> {
        let tab = self.selected_tab().await;
        if !self.resolve_tabs().await.contains(tab) {
            return Vec::new();
        }
        self.tab_resources
            .lock()
            .await
            .get(&tab)
            .and_then(|r| r.item())
            .unwrap_or_default()
    }

    pub async fn list_move_up(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.list_selected = ui.list_selected.saturating_sub(1);
    }

    pub async fn list_move_down(&self) {
        let len = self.selected_tab_entries().await.len();
        let mut ui = self.ui_state.lock().await;
        if ui.list_selected < len.saturating_sub(1) {
            ui.list_selected += 1;
        }
    }

    pub async fn selected_list_entry(&self) -> Option<ListEntry> {
        let entries = self.selected_tab_entries().await;
        let index = self.ui_state.lock().await.list_selected;
        entries.get(index).cloned()
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn start_search_editing(&self) {
        self.ui_state.lock().await.search_editing = true;
    }

    pub async fn stop_search_editing(&self) {
        self.ui_state.lock().await.search_editing = false;
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    /// Replace the search results with a fresh query
    pub async fn submit_search(&self) {
        let query = {
            let mut ui = self.ui_state.lock().await;
            ui.search_editing = false;
            ui.list_selected = 0;
            ui.search_query.clone()
        };
        tracing::debug!(query = %query, "Submitting search");
        let resource = self.tab_resource(TabSelection::Search, query);
        resource.load();
        self.tab_resources.lock().await.insert(TabSelection::Search, resource);
    }

    // ========================================================================
    // Detail overlays
    // ========================================================================

    pub async fn present_channel(&self, channel: Channel) -> OverlayId {
        let mut nav = self.navigation.lock().await;
        let id = nav.intent.present_channel(channel.clone());

        let reuse = nav
            .channel
            .as_ref()
            .is_some_and(|store| store.id == id && store.resource.key() == channel.id);
        if !reuse {
            let api = self.api.clone();
            let channel_id = channel.id.clone();
            let resource = Resource::new(channel.id.clone(), move || {
                let api = api.clone();
                let channel_id = channel_id.clone();
                async move { api.channel(&channel_id).await }.boxed()
            });
            nav.channel = Some(OverlayStore { id, resource, selected: 0 });
        }

        if let Some(store) = &nav.channel {
            if store.resource.item().is_none() {
                store.resource.load();
            }
        }
        tracing::info!(overlay = %id, channel = %channel.id, "Presenting channel");
        id
    }

    pub async fn present_playlist(&self, playlist: ChannelPlaylist) -> OverlayId {
        let mut nav = self.navigation.lock().await;
        let id = nav.intent.present_playlist(playlist.clone());

        let reuse = nav
            .playlist
            .as_ref()
            .is_some_and(|store| store.id == id && store.resource.key() == playlist.id);
        if !reuse {
            let api = self.api.clone();
            let playlist_id = playlist.id.clone();
            let resource = Resource::new(playlist.id.clone(), move || {
                let api = api.clone();
                let playlist_id = playlist_id.clone();
                async move { api.channel_playlist(&playlist_id).await }.boxed()
            });
            nav.playlist = Some(OverlayStore { id, resource, selected: 0 });
        }

        if let Some(store) = &nav.playlist {
            store.resource.load_if_needed();
        }
        tracing::info!(overlay = %id, playlist = %playlist.id, "Presenting playlist");
        id
    }

    /// Clear the overlay's presentation flag and drop its per-presentation state
    pub async fn dismiss_overlay(&self, kind: OverlayKind) {
        let mut nav = self.navigation.lock().await;
        nav.intent.dismiss(kind);
        match kind {
            OverlayKind::Channel => nav.channel = None,
            OverlayKind::Playlist => nav.playlist = None,
        }
        tracing::debug!(?kind, "Overlay dismissed");
    }

    pub async fn resolved_overlays(&self) -> Vec<OverlayDescriptor> {
        let player_active = self.is_player_presenting().await;
        let nav = self.navigation.lock().await;
        resolve_overlays(&nav.intent, player_active)
    }

    /// The overlay receiving input, if one is stacked above main content
    pub async fn topmost_overlay(&self) -> Option<OverlayKind> {
        let overlays = self.resolved_overlays().await;
        topmost(&overlays).map(|o| o.kind())
    }

    pub async fn overlay_move(&self, kind: OverlayKind, down: bool) {
        let mut nav = self.navigation.lock().await;
        let (selected, len) = match kind {
            OverlayKind::Channel => match nav.channel.as_mut() {
                Some(store) => {
                    let len = store.resource.item().map(|c| c.videos.len()).unwrap_or(0);
                    (&mut store.selected, len)
                }
                None => return,
            },
            OverlayKind::Playlist => match nav.playlist.as_mut() {
                Some(store) => {
                    let len = store.resource.item().map(|p| p.videos.len()).unwrap_or(0);
                    (&mut store.selected, len)
                }
                None => return,
            },
        };
        if down {
            if *selected < len.saturating_sub(1) {
                *selected += 1;
            }
        } else {
            *selected = selected.saturating_sub(1);
        }
    }

    pub async fn selected_overlay_video(&self, kind: OverlayKind) -> Option<Video> {
        let nav = self.navigation.lock().await;
        match kind {
            OverlayKind::Channel => nav
                .channel
                .as_ref()
                .and_then(|s| s.resource.item().and_then(|c| c.videos.get(s.selected).cloned())),
            OverlayKind::Playlist => nav
                .playlist
                .as_ref()
                .and_then(|s| s.resource.item().and_then(|p| p.videos.get(s.selected).cloned())),
        }
    }

    /// The channel targeted by the channel overlay, preferring loaded data
    pub async fn overlay_channel(&self) -> Option<Channel> {
        let nav = self.navigation.lock().await;
        let loaded = nav.channel.as_ref().and_then(|s| s.resource.item());
        loaded.or_else(|| nav.intent.channel_target.clone())
    }

    pub async fn overlay_content_item(&self, kind: OverlayKind) -> Option<ContentItem> {
        match kind {
            OverlayKind::Channel => self.overlay_channel().await.map(ContentItem::Channel),
            OverlayKind::Playlist => {
                let nav = self.navigation.lock().await;
                let loaded = nav.playlist.as_ref().and_then(|s| s.resource.item());
                loaded
                    .or_else(|| nav.intent.playlist_target.clone())
                    .map(ContentItem::Playlist)
            }
        }
    }

    pub async fn get_overlay_views(&self) -> Vec<OverlayView> {
        let descriptors = self.resolved_overlays().await;
        let can_toggle = self.can_toggle_subscription();
        let platform = self.config.platform;

        let mut views = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let chrome = overlay_chrome(platform, descriptor.kind(), can_toggle);
            let view = match descriptor.kind() {
                OverlayKind::Channel => {
                    let (target, store_state, selected) = {
                        let nav = self.navigation.lock().await;
                        (
                            nav.intent.channel_target.clone(),
                            nav.channel.as_ref().map(|s| s.resource.state()),
                            nav.channel.as_ref().map(|s| s.selected).unwrap_or(0),
                        )
                    };
                    let state = store_state.unwrap_or_default();
                    let loaded = state.item().cloned();
                    let channel_id = loaded
                        .as_ref()
                        .map(|c| c.id.clone())
                        .or_else(|| target.as_ref().map(|c| c.id.clone()))
                        .unwrap_or_default();
                    OverlayView {
                        descriptor,
                        title: loaded
                            .as_ref()
                            .map(|c| c.name.clone())
                            .or_else(|| target.as_ref().map(|c| c.name.clone()))
                            .unwrap_or_default(),
                        subscribers: loaded.as_ref().and_then(|c| c.subscriptions_string()),
                        videos: map_state(state, |c| c.videos),
                        selected,
                        subscribed: self.subscriptions.is_subscribing(&channel_id).await,
                        chrome,
                    }
                }
                OverlayKind::Playlist => {
                    let nav = self.navigation.lock().await;
                    let state = nav.playlist.as_ref().map(|s| s.resource.state()).unwrap_or_default();
                    OverlayView {
                        descriptor,
                        title: nav
                            .intent
                            .playlist_target
                            .as_ref()
                            .map(|p| p.title.clone())
                            .unwrap_or_default(),
                        subscribers: None,
                        videos: map_state(state, |p| p.videos),
                        selected: nav.playlist.as_ref().map(|s| s.selected).unwrap_or(0),
                        subscribed: false,
                        chrome,
                    }
                }
            };
            views.push(view);
        }
        views
    }

    // ========================================================================
    // Player
    // ========================================================================

    pub async fn play_video(&self, video: &Video) {
        tracing::info!(video = %video.id, title = %video.title, "Playing video");
        self.present_player(NowPlaying {
            title: video.title.clone(),
            author: video.author.clone(),
            length_seconds: video.length_seconds,
            started_at: Instant::now(),
        })
        .await;
    }

    pub async fn present_player(&self, now_playing: NowPlaying) {
        let mut player = self.player.lock().await;
        player.now_playing = Some(now_playing);
        player.presenting_player = true;
    }

    pub async fn close_player(&self) {
        self.player.lock().await.presenting_player = false;
    }

    /// Bring back the full-screen player for whatever is still playing
    pub async fn reopen_player(&self) -> bool {
        let mut player = self.player.lock().await;
        if player.now_playing.is_none() {
            return false;
        }
        player.presenting_player = true;
        true
    }

    pub async fn stop_playback(&self) {
        let mut player = self.player.lock().await;
        if let Some(now_playing) = player.now_playing.take() {
            tracing::info!(title = %now_playing.title, "Playback stopped");
        }
        player.presenting_player = false;
    }

    pub async fn is_player_presenting(&self) -> bool {
        self.player.lock().await.presenting_player
    }

    pub async fn get_player_state(&self) -> PlayerState {
        self.player.lock().await.clone()
    }

    // ========================================================================
    // Share, modals, settings
    // ========================================================================

    pub fn share_url(&self, item: &ContentItem) -> Option<String> {
        self.accounts
            .current()
            .map(|account| InstanceLinks::for_account(&account).share_url(item))
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_modal(&self, modal: Modal) {
        self.ui_state.lock().await.modal = modal;
    }

    pub async fn close_modal(&self) {
        self.ui_state.lock().await.modal = Modal::None;
    }

    pub async fn settings_move(&self, down: bool) {
        let rows = SettingsRow::all().len();
        let mut ui = self.ui_state.lock().await;
        if let Modal::Settings { selected } = &mut ui.modal {
            if down {
                *selected = (*selected + 1).min(rows - 1);
            } else {
                *selected = selected.saturating_sub(1);
            }
        }
    }

    pub async fn toggle_selected_setting(&self) {
        let selected = match self.ui_state.lock().await.modal {
            Modal::Settings { selected } => selected,
            _ => return,
        };
        let Some(row) = SettingsRow::all().get(selected).copied() else {
            return;
        };
        self.preferences.update(|prefs| match row {
            SettingsRow::ShowHome => prefs.show_home = !prefs.show_home,
            SettingsRow::ShowDocuments => prefs.show_documents = !prefs.show_documents,
            SettingsRow::ShowOpenActions => {
                prefs.show_open_actions_toolbar_item = !prefs.show_open_actions_toolbar_item
            }
            SettingsRow::Section(section) => prefs.toggle_section(section),
        });
        tracing::debug!(?row, "Preference toggled");
    }

    // ========================================================================
    // Errors & lifecycle
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

fn map_state<T, U>(state: LoadState<T>, f: impl FnOnce(T) -> U) -> LoadState<U> {
    match state {
        LoadState::Idle => LoadState::Idle,
        LoadState::Loading => LoadState::Loading,
        LoadState::Loaded(item) => LoadState::Loaded(f(item)),
        LoadState::Failed(error) => LoadState::Failed(error),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::accounts::demo_accounts;
    use crate::model::catalog::{LocalCatalog, demo_catalog};
    use crate::model::preferences::Preferences;
    use crate::model::types::VisibleSection;

    pub(crate) struct Fixture {
        pub model: AppModel,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        pub(crate) fn into_parts(self) -> (AppModel, tempfile::TempDir) {
            (self.model, self._dir)
        }
    }

    pub(crate) async fn fixture(preferences: Preferences) -> Fixture {
        fixture_with_accounts(preferences, demo_accounts()).await
    }

    async fn fixture_with_accounts(preferences: Preferences, accounts: Vec<Account>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            documents_dir: dir.path().join("docs"),
            preferences_path: dir.path().join("prefs.json"),
            subscriptions_path: dir.path().join("subs.json"),
            ..AppConfig::default()
        };
        let accounts = Arc::new(AccountsModel::new(accounts, None));
        let preferences = Arc::new(PreferenceStore::new(&config.preferences_path, preferences));
        let subscriptions = SubscribedChannels::new(&config.subscriptions_path);
        subscriptions.set_account(accounts.current_id()).await;
        let api: Arc<dyn VideosApi> = Arc::new(LocalCatalog::new(demo_catalog()));
        Fixture {
            model: AppModel::new(config, accounts, preferences, api, subscriptions),
            _dir: dir,
        }
    }

    pub(crate) async fn wait_tab_loaded(model: &AppModel) -> Vec<ListEntry> {
        let tab = model.selected_tab().await;
        let resource = model.tab_resources.lock().await.get(&tab).cloned().unwrap();
        let mut rx = resource.subscribe();
        loop {
            if let LoadState::Loaded(items) = rx.borrow_and_update().clone() {
                return items;
            }
            rx.changed().await.unwrap();
        }
    }

    pub(crate) async fn wait_channel_loaded(model: &AppModel) -> Channel {
        let resource = {
            let nav = model.navigation.lock().await;
            nav.channel.as_ref().unwrap().resource.clone()
        };
        let mut rx = resource.subscribe();
        loop {
            if let LoadState::Loaded(channel) = rx.borrow_and_update().clone() {
                return channel;
            }
            rx.changed().await.unwrap();
        }
    }

    fn channel(id: &str) -> Channel {
        Channel {
            id: id.into(),
            name: "placeholder".into(),
            subscriber_count: None,
            videos: vec![],
        }
    }

    fn playlist(id: &str) -> ChannelPlaylist {
        ChannelPlaylist {
            id: id.into(),
            title: "Rust basics".into(),
            channel_id: "UCrust".into(),
            videos: vec![],
        }
    }

    #[tokio::test]
    async fn test_account_switch_resets_tab_list() {
        let f = fixture(Preferences::default()).await;
        let before = f.model.resolve_tabs().await;
        assert!(before.contains(TabSelection::Subscriptions));

        f.model.switch_to_next_account().await;
        let after = f.model.resolve_tabs().await;
        assert!(after.generation > before.generation);
        // Anonymous Piped account: no personal tabs
        assert!(!after.contains(TabSelection::Subscriptions));
        assert!(!after.contains(TabSelection::Playlists));
        assert!(after.contains(TabSelection::Search));
    }

    #[tokio::test]
    async fn test_preference_change_recomputes_and_reconciles_selection() {
        let f = fixture(Preferences::default()).await;
        assert!(f.model.select_tab(TabSelection::Trending).await);

        f.model.preferences.update(|p| {
            p.visible_sections.remove(&VisibleSection::Trending);
        });
        let tabs = f.model.resolve_tabs().await;
        assert!(!tabs.contains(TabSelection::Trending));
        assert_eq!(f.model.selected_tab().await, TabSelection::Home);
    }

    #[tokio::test]
    async fn test_invisible_tab_cannot_be_selected() {
        let f = fixture(Preferences::default()).await;
        assert!(!f.model.select_tab(TabSelection::Popular).await);
        assert_eq!(f.model.selected_tab().await, TabSelection::Home);
    }

    #[tokio::test]
    async fn test_hidden_selected_tab_exposes_no_content() {
        let preferences = Preferences {
            show_home: false,
            show_documents: false,
            ..Preferences::default()
        };
        let f = fixture_with_accounts(preferences, vec![]).await;
        let tabs = f.model.resolve_tabs().await;
        assert!(tabs.tabs.is_empty());
        assert_eq!(f.model.selected_tab().await, TabSelection::Home);

        f.model.appear_selected_tab().await;
        assert!(f.model.tab_resources.lock().await.is_empty());

        let view = f.model.get_tab_view().await;
        assert!(matches!(view.content, LoadState::Idle));
        assert!(f.model.selected_list_entry().await.is_none());
    }

    #[tokio::test]
    async fn test_selected_tab_loads_on_appear() {
        let f = fixture(Preferences::default()).await;
        f.model.resolve_tabs().await;
        f.model.appear_selected_tab().await;
        let entries = wait_tab_loaded(&f.model).await;
        assert_eq!(entries[0].title(), "Launch recap: week 20");

        f.model.list_move_down().await;
        let selected = f.model.selected_list_entry().await.unwrap();
        assert_eq!(selected.title(), entries[1].title());
    }

    #[tokio::test]
    async fn test_search_submission() {
        let f = fixture(Preferences::default()).await;
        assert!(f.model.select_tab(TabSelection::Search).await);
        for c in "kitchen".chars() {
            f.model.append_to_search(c).await;
        }
        f.model.submit_search().await;
        let results = wait_tab_loaded(&f.model).await;
        assert!(matches!(&results[0], ListEntry::Content(ContentItem::Channel(c)) if c.id == "UCcook"));
    }

    #[tokio::test]
    async fn test_channel_overlay_loads_and_titles() {
        let f = fixture(Preferences::default()).await;
        f.model.present_channel(channel("UCspace")).await;
        let loaded = wait_channel_loaded(&f.model).await;
        assert_eq!(loaded.name, "Orbit Weekly");

        let views = f.model.get_overlay_views().await;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Orbit Weekly");
        assert_eq!(views[0].subscribers.as_deref(), Some("910K"));
        assert_eq!(views[0].descriptor.z_index, 2);
    }

    #[tokio::test]
    async fn test_player_sinks_overlays_and_topmost() {
        let f = fixture(Preferences::default()).await;
        f.model.present_playlist(playlist("PLrust-basics")).await;
        f.model.present_channel(channel("UCrust")).await;
        assert_eq!(f.model.topmost_overlay().await, Some(OverlayKind::Channel));

        f.model.dismiss_overlay(OverlayKind::Channel).await;
        assert_eq!(f.model.topmost_overlay().await, Some(OverlayKind::Playlist));

        f.model.present_channel(channel("UCrust")).await;
        f.model
            .present_player(NowPlaying {
                title: "t".into(),
                author: "a".into(),
                length_seconds: 10,
                started_at: Instant::now(),
            })
            .await;
        assert!(f.model.resolved_overlays().await.iter().all(|o| o.z_index == -1));
        assert_eq!(f.model.topmost_overlay().await, None);
    }

    #[tokio::test]
    async fn test_representing_overlay_gets_fresh_store() {
        let f = fixture(Preferences::default()).await;
        let first = f.model.present_playlist(playlist("PLrust-basics")).await;
        f.model.dismiss_overlay(OverlayKind::Playlist).await;
        let second = f.model.present_playlist(playlist("PLrust-basics")).await;
        assert_ne!(first, second);

        let nav = f.model.navigation.lock().await;
        assert_eq!(nav.playlist.as_ref().unwrap().id, second);
        assert_eq!(nav.playlist.as_ref().unwrap().selected, 0);
    }

    #[tokio::test]
    async fn test_toggle_setting_updates_preferences() {
        let f = fixture(Preferences::default()).await;
        f.model.set_modal(Modal::Settings { selected: 0 }).await;
        f.model.settings_move(true).await;
        f.model.toggle_selected_setting().await;
        assert!(f.model.preferences.get().show_documents);
        assert!(f.model.resolve_tabs().await.contains(TabSelection::Documents));
    }

    #[tokio::test]
    async fn test_share_url_uses_current_account() {
        let f = fixture(Preferences::default()).await;
        let url = f.model.share_url(&ContentItem::Channel(channel("UCrust"))).unwrap();
        assert_eq!(url, "https://invidious.example.org/channel/UCrust");
    }
}
