//! Subscriptions, sharing, accounts and opening videos by id

use crate::model::{Channel, ContentItem, Modal, OverlayKind, SubscriptionService};
use super::AppController;

impl AppController {
    /// Subscribe to the channel overlay's channel, or ask before unsubscribing
    pub async fn toggle_subscription(&self) {
        let model = self.model.lock().await;
        if !model.can_toggle_subscription() {
            model
                .set_error("Sign in to an account with subscriptions to follow channels.".to_string())
                .await;
            return;
        }
        let Some(channel) = model.overlay_channel().await else {
            return;
        };

        if model.subscriptions.is_subscribing(&channel.id).await {
            model.set_modal(Modal::UnsubscribeAlert { channel }).await;
            return;
        }

        let subscriptions = model.subscriptions.clone();
        let sidebar_changed = model.sidebar_section_changed();
        drop(model);

        let on_complete = Box::new(move || sidebar_changed.update(|flag| *flag = !*flag));
        if let Err(e) = subscriptions.subscribe(&channel.id, on_complete).await {
            tracing::error!(channel = %channel.id, error = %e, "Subscribe failed");
            let model = self.model.lock().await;
            model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn confirm_unsubscribe(&self, channel: Channel) {
        let model = self.model.lock().await;
        model.close_modal().await;
        let subscriptions = model.subscriptions.clone();
        let sidebar_changed = model.sidebar_section_changed();
        drop(model);

        match subscriptions.unsubscribe(&channel.id).await {
            Ok(()) => sidebar_changed.update(|flag| *flag = !*flag),
            Err(e) => {
                tracing::error!(channel = %channel.id, error = %e, "Unsubscribe failed");
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn share_item(&self, item: ContentItem) {
        let model = self.model.lock().await;
        match model.share_url(&item) {
            Some(url) => {
                tracing::debug!(url = %url, "Sharing");
                model
                    .set_modal(Modal::Share {
                        title: item.title().to_string(),
                        url,
                    })
                    .await;
            }
            None => model.set_error("No account to build a link from.".to_string()).await,
        }
    }

    pub async fn share_overlay(&self, kind: OverlayKind) {
        let item = self.model.lock().await.overlay_content_item(kind).await;
        if let Some(item) = item {
            self.share_item(item).await;
        }
    }

    pub async fn switch_account(&self) {
        let model = self.model.lock().await;
        match model.switch_to_next_account().await {
            Some(account) => {
                tracing::info!(account = %account.id, "Account switched");
                model.resolve_tabs().await;
                model.appear_selected_tab().await;
            }
            None => model.set_error("No accounts configured.".to_string()).await,
        }
    }

    /// Look up each whitespace-separated id and play the first one found
    pub async fn open_videos(&self, input: &str) {
        let model = self.model.lock().await;
        model.close_modal().await;
        let api = model.api();
        drop(model);

        let ids: Vec<&str> = input.split_whitespace().collect();
        if ids.is_empty() {
            return;
        }

        let mut last_error = None;
        for id in ids {
            match api.video(id).await {
                Ok(video) => {
                    self.play_video(&video).await;
                    return;
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "Video lookup failed");
                    last_error = Some(e);
                }
            }
        }
        if let Some(e) = last_error {
            let model = self.model.lock().await;
            model.set_error(Self::format_error(&e)).await;
        }
    }
}
