//! Shareable links for content items

use super::types::{Account, ContentItem, ServiceKind};

pub trait ShareLinkProvider {
    fn share_url(&self, item: &ContentItem) -> String;
}

/// Builds links against the frontend of the account's instance
pub struct InstanceLinks {
    base: String,
    service: ServiceKind,
}

impl InstanceLinks {
    pub fn for_account(account: &Account) -> Self {
        Self {
            base: account.instance_url.trim_end_matches('/').to_string(),
            service: account.service,
        }
    }
}

impl ShareLinkProvider for InstanceLinks {
    fn share_url(&self, item: &ContentItem) -> String {
        if self.service == ServiceKind::Local {
            return match item {
                ContentItem::Video(v) => format!("vidtabs://video/{}", v.id),
                ContentItem::Channel(c) => format!("vidtabs://channel/{}", c.id),
                ContentItem::Playlist(p) => format!("vidtabs://playlist/{}", p.id),
            };
        }
        match item {
            ContentItem::Video(v) => format!("{}/watch?v={}", self.base, v.id),
            ContentItem::Channel(c) => format!("{}/channel/{}", self.base, c.id),
            ContentItem::Playlist(p) => format!("{}/playlist?list={}", self.base, p.id),
        }
    }
}
