//! View module - UI rendering
//!
//! Organized into submodules by component type:
//!
//! - `utils`: Shared formatting helpers and scrollable lists
//! - `layout`: Tab strip, search bar, toolbar hints
//! - `content`: Selected tab's list
//! - `overlays`: Detail overlays and modal popups
//! - `player`: Full-screen player and controls bar

mod content;
mod layout;
mod overlays;
mod player;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{
    MAIN_CONTENT_Z, Modal, OverlayView, PlayerState, Preferences, TabSelection, TabView, UiState,
};

/// Everything one frame needs, snapshotted from the model
pub struct FrameState {
    pub tabs: TabView,
    pub overlays: Vec<OverlayView>,
    pub player: PlayerState,
    pub ui_state: UiState,
    pub preferences: Preferences,
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, state: &FrameState) {
        let show_search = state.tabs.selected == TabSelection::Search;
        let show_controls = state.player.shows_controls_bar();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                                    // Tab strip + account
                Constraint::Length(if show_search { 3 } else { 0 }),      // Search bar
                Constraint::Min(0),                                       // Main content
                Constraint::Length(1),                                    // Toolbar hints
                Constraint::Length(if show_controls { 1 } else { 0 }),    // Controls bar
            ])
            .split(frame.area());

        layout::render_tab_strip(frame, chunks[0], &state.tabs);
        if show_search {
            layout::render_search_bar(frame, chunks[1], &state.tabs.search_query, state.tabs.search_editing);
        }

        // Overlays are ordered bottom to top; anything below main content stays hidden
        let visible: Vec<&OverlayView> = state
            .overlays
            .iter()
            .filter(|o| o.descriptor.z_index > MAIN_CONTENT_Z)
            .collect();

        content::render_tab_content(frame, chunks[2], &state.tabs, visible.is_empty());
        if state.tabs.toolbar.is_empty() {
            layout::render_status_line(frame, chunks[3], " H help · Tab switch tabs · Q quit");
        } else {
            layout::render_toolbar(frame, chunks[3], &state.tabs.toolbar, false);
        }

        let overlay_area = chunks[2].union(chunks[3]);
        for (i, overlay) in visible.iter().enumerate() {
            let is_top = i + 1 == visible.len();
            overlays::render_detail_overlay(frame, overlay_area, overlay, is_top);
        }

        if show_controls {
            player::render_controls_bar(frame, chunks[4], &state.player);
        }

        if state.player.presenting_player {
            player::render_player(frame, frame.area(), &state.player);
        }

        match &state.ui_state.modal {
            Modal::None => {}
            Modal::Help => overlays::render_help_popup(frame),
            Modal::Settings { selected } => overlays::render_settings_popup(frame, &state.preferences, *selected),
            Modal::Share { title, url } => overlays::render_share_popup(frame, title, url),
            Modal::UnsubscribeAlert { channel } => overlays::render_unsubscribe_alert(frame, &channel.name),
            Modal::OpenVideos { input } => overlays::render_open_videos_popup(frame, input),
        }

        // Error notification overlay (if there's an error)
        if state.ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, &state.ui_state);
        }
    }
}
