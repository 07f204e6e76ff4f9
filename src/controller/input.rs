//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ListEntry, Modal, OverlayKind, TabSelection};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Modal popups
        match ui_state.modal {
            Modal::None => {}
            Modal::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                    model.close_modal().await;
                }
                return Ok(());
            }
            Modal::Settings { .. } => {
                match key.code {
                    KeyCode::Up => model.settings_move(false).await,
                    KeyCode::Down => model.settings_move(true).await,
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        model.toggle_selected_setting().await;
                        model.resolve_tabs().await;
                        model.appear_selected_tab().await;
                    }
                    KeyCode::Esc | KeyCode::Char(',') => model.close_modal().await,
                    _ => {}
                }
                return Ok(());
            }
            Modal::Share { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('y')) {
                    model.close_modal().await;
                }
                return Ok(());
            }
            Modal::UnsubscribeAlert { channel } => {
                match key.code {
                    KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                        drop(model);
                        self.confirm_unsubscribe(channel).await;
                    }
                    KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => model.close_modal().await,
                    _ => {}
                }
                return Ok(());
            }
            Modal::OpenVideos { mut input } => {
                match key.code {
                    KeyCode::Enter => {
                        drop(model);
                        self.open_videos(&input).await;
                    }
                    KeyCode::Esc => model.close_modal().await,
                    KeyCode::Backspace => {
                        input.pop();
                        model.set_modal(Modal::OpenVideos { input }).await;
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        model.set_modal(Modal::OpenVideos { input }).await;
                    }
                    _ => {}
                }
                return Ok(());
            }
        }

        // Search query editing
        if ui_state.search_editing {
            match key.code {
                KeyCode::Enter => {
                    model.submit_search().await;
                }
                KeyCode::Esc => {
                    model.stop_search_editing().await;
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                }
                KeyCode::Char(c) => {
                    // Q still quits while editing when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                    } else {
                        model.append_to_search(c).await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        // Full-screen player covers everything else
        if model.is_player_presenting().await {
            match key.code {
                KeyCode::Esc | KeyCode::Backspace => {
                    drop(model);
                    self.dismiss_topmost().await;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => model.set_should_quit(true).await,
                _ => {}
            }
            return Ok(());
        }

        // Topmost detail overlay
        if let Some(kind) = model.topmost_overlay().await {
            match key.code {
                KeyCode::Up => model.overlay_move(kind, false).await,
                KeyCode::Down => model.overlay_move(kind, true).await,
                KeyCode::Enter => {
                    drop(model);
                    self.play_overlay_selection(kind).await;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    drop(model);
                    self.dismiss_topmost().await;
                }
                KeyCode::Char('s') | KeyCode::Char('S') if kind == OverlayKind::Channel => {
                    drop(model);
                    self.toggle_subscription().await;
                }
                KeyCode::Char('c') | KeyCode::Char('C') if kind == OverlayKind::Playlist => {
                    let video = model.selected_overlay_video(kind).await;
                    drop(model);
                    if let Some(video) = video {
                        self.open_channel_of(&video).await;
                    }
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    drop(model);
                    self.share_overlay(kind).await;
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    model.reopen_player().await;
                }
                KeyCode::Char('x') | KeyCode::Char('X') => model.stop_playback().await,
                KeyCode::Char('h') | KeyCode::Char('H') => model.set_modal(Modal::Help).await,
                KeyCode::Char('q') | KeyCode::Char('Q') => model.set_should_quit(true).await,
                _ => {}
            }
            return Ok(());
        }

        // Tab content and global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_tab_backward().await;
                } else {
                    model.cycle_tab_forward().await;
                }
                model.appear_selected_tab().await;
            }
            KeyCode::BackTab => {
                model.cycle_tab_backward().await;
                model.appear_selected_tab().await;
            }
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                if model.select_tab_at(index).await {
                    model.appear_selected_tab().await;
                }
            }
            KeyCode::Up => model.list_move_up().await,
            KeyCode::Down => model.list_move_down().await,
            KeyCode::Enter => {
                let entry = model.selected_list_entry().await;
                drop(model);
                if let Some(entry) = entry {
                    self.handle_selected_entry(entry).await;
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                self.open_selected_entry_channel().await;
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let entry = model.selected_list_entry().await;
                drop(model);
                if let Some(ListEntry::Content(item)) = entry {
                    self.share_item(item).await;
                }
            }
            KeyCode::Char('/') => {
                if ui_state.tab.get() == TabSelection::Search || model.select_tab(TabSelection::Search).await {
                    model.start_search_editing().await;
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                drop(model);
                self.switch_account().await;
            }
            KeyCode::Char(',') => {
                model.set_modal(Modal::Settings { selected: 0 }).await;
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if model.preferences.get().show_open_actions_toolbar_item {
                    model.set_modal(Modal::OpenVideos { input: String::new() }).await;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                model.reload_selected_tab().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                model.reopen_player().await;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                model.stop_playback().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.set_modal(Modal::Help).await;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyEvent;
    use tokio::sync::Mutex;

    use super::*;
    use crate::model::app_model_tests::fixture;
    use crate::model::{Channel, ChannelPlaylist, Preferences, SubscriptionService};

    async fn controller() -> (AppController, tempfile::TempDir) {
        let (model, dir) = fixture(Preferences::default()).await.into_parts();
        (AppController::new(Arc::new(Mutex::new(model))), dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn channel() -> Channel {
        Channel {
            id: "UCrust".into(),
            name: "Rustacean Station".into(),
            subscriber_count: None,
            videos: vec![],
        }
    }

    fn playlist() -> ChannelPlaylist {
        ChannelPlaylist {
            id: "PLrust-basics".into(),
            title: "Rust basics".into(),
            channel_id: "UCrust".into(),
            videos: vec![],
        }
    }

    #[tokio::test]
    async fn test_escape_dismisses_topmost_first() {
        let (controller, _dir) = controller().await;
        controller.open_playlist(playlist()).await;
        controller.open_channel(channel()).await;
        controller.play_video(&crate::model::Video {
            id: "rv1".into(),
            title: "Ownership in ten minutes".into(),
            author: "Rustacean Station".into(),
            channel_id: "UCrust".into(),
            length_seconds: 617,
            views: 1,
            published: chrono::Utc::now(),
        })
        .await;

        controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        {
            let model = controller.model.lock().await;
            assert!(!model.is_player_presenting().await);
            assert_eq!(model.topmost_overlay().await, Some(OverlayKind::Channel));
        }

        controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(
            controller.model.lock().await.topmost_overlay().await,
            Some(OverlayKind::Playlist)
        );

        controller.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(controller.model.lock().await.topmost_overlay().await, None);
    }

    #[tokio::test]
    async fn test_closed_player_reopens_from_controls_bar() {
        let (controller, _dir) = controller().await;
        controller.open_channel(channel()).await;
        controller.play_video(&crate::model::Video {
            id: "rv1".into(),
            title: "Ownership in ten minutes".into(),
            author: "Rustacean Station".into(),
            channel_id: "UCrust".into(),
            length_seconds: 617,
            views: 1,
            published: chrono::Utc::now(),
        })
        .await;

        controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        let player = controller.model.lock().await.get_player_state().await;
        assert!(player.shows_controls_bar());
        assert_eq!(player.now_playing.unwrap().title, "Ownership in ten minutes");

        // The channel overlay is on top, and P still brings the player back
        controller.handle_key_event(key(KeyCode::Char('p'))).await.unwrap();
        assert!(controller.model.lock().await.is_player_presenting().await);

        controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        controller.handle_key_event(key(KeyCode::Char('x'))).await.unwrap();
        let player = controller.model.lock().await.get_player_state().await;
        assert!(!player.shows_controls_bar());
        assert!(player.now_playing.is_none());

        // Nothing left to reopen
        controller.handle_key_event(key(KeyCode::Char('p'))).await.unwrap();
        assert!(!controller.model.lock().await.is_player_presenting().await);
    }

    #[tokio::test]
    async fn test_error_blocks_other_keys() {
        let (controller, _dir) = controller().await;
        controller.model.lock().await.set_error("boom".into()).await;

        controller.handle_key_event(key(KeyCode::Char('q'))).await.unwrap();
        assert!(!controller.model.lock().await.should_quit().await);

        controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.lock().await.has_error().await);
    }

    #[tokio::test]
    async fn test_digit_jumps_to_visible_tab() {
        let (controller, _dir) = controller().await;
        controller.refresh_tabs().await;
        // Home, Subscriptions, Trending, Playlists, Search
        controller.handle_key_event(key(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(controller.model.lock().await.selected_tab().await, TabSelection::Trending);

        controller.handle_key_event(key(KeyCode::Char('7'))).await.unwrap();
        assert_eq!(controller.model.lock().await.selected_tab().await, TabSelection::Trending);
    }

    #[tokio::test]
    async fn test_open_videos_requires_preference() {
        let (controller, _dir) = controller().await;
        controller.handle_key_event(key(KeyCode::Char('o'))).await.unwrap();
        assert_eq!(controller.model.lock().await.get_ui_state().await.modal, Modal::None);

        controller
            .model
            .lock()
            .await
            .preferences
            .update(|p| p.show_open_actions_toolbar_item = true);
        controller.handle_key_event(key(KeyCode::Char('o'))).await.unwrap();
        for c in "sv2".chars() {
            controller.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
        controller.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        let player = controller.model.lock().await.get_player_state().await;
        assert!(player.presenting_player);
        assert_eq!(player.now_playing.unwrap().title, "How ion engines work");
    }

    #[tokio::test]
    async fn test_subscribe_then_unsubscribe_asks_first() {
        let (controller, _dir) = controller().await;
        controller.open_channel(channel()).await;

        controller.handle_key_event(key(KeyCode::Char('s'))).await.unwrap();
        {
            let model = controller.model.lock().await;
            assert!(model.subscriptions.is_subscribing("UCrust").await);
        }

        controller.handle_key_event(key(KeyCode::Char('s'))).await.unwrap();
        assert!(matches!(
            controller.model.lock().await.get_ui_state().await.modal,
            Modal::UnsubscribeAlert { .. }
        ));

        controller.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        let model = controller.model.lock().await;
        assert!(!model.subscriptions.is_subscribing("UCrust").await);
        assert_eq!(model.get_ui_state().await.modal, Modal::None);
    }
}
