//! Subscribed channels, per account, persisted to disk

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub const SUBSCRIPTIONS_CACHE_FILE: &str = ".cache/subscriptions.json";

/// Callback run after a subscribe request went through
pub type OnComplete = Box<dyn FnOnce() + Send>;

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn is_subscribing(&self, channel_id: &str) -> bool;
    async fn subscribe(&self, channel_id: &str, on_complete: OnComplete) -> Result<()>;
    async fn unsubscribe(&self, channel_id: &str) -> Result<()>;
}

/// Subscriptions of every account, keyed by account id
#[derive(Clone)]
pub struct SubscribedChannels {
    path: PathBuf,
    by_account: Arc<RwLock<BTreeMap<String, BTreeSet<String>>>>,
    account: Arc<RwLock<Option<String>>>,
}

impl SubscribedChannels {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            by_account: Arc::new(RwLock::new(BTreeMap::new())),
            account: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            let map: BTreeMap<String, BTreeSet<String>> = serde_json::from_str(&content)?;
            *self.by_account.write().await = map;
        }
        Ok(())
    }

    fn write_map(&self, map: &BTreeMap<String, BTreeSet<String>>) -> Result<()> {
        ensure_parent(&self.path)?;
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Apply `edit` to a copy of the current account's set; commit only once it is on disk
    async fn commit(&self, account: &str, edit: impl FnOnce(&mut BTreeSet<String>)) -> Result<()> {
        let mut map = self.by_account.write().await;
        let mut next = map.clone();
        edit(next.entry(account.to_string()).or_default());
        self.write_map(&next)?;
        *map = next;
        Ok(())
    }

    /// Scope subsequent calls to `account_id`
    pub async fn set_account(&self, account_id: Option<String>) {
        *self.account.write().await = account_id;
    }

    pub async fn channel_ids(&self) -> Vec<String> {
        let Some(account) = self.account.read().await.clone() else {
            return Vec::new();
        };
        self.by_account
            .read()
            .await
            .get(&account)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn current_account(&self) -> Result<String> {
        match self.account.read().await.clone() {
            Some(account) => Ok(account),
            None => bail!("No account selected"),
        }
    }
}

#[async_trait]
impl SubscriptionService for SubscribedChannels {
    async fn is_subscribing(&self, channel_id: &str) -> bool {
        let Some(account) = self.account.read().await.clone() else {
            return false;
        };
        self.by_account
            .read()
            .await
            .get(&account)
            .is_some_and(|ids| ids.contains(channel_id))
    }

    async fn subscribe(&self, channel_id: &str, on_complete: OnComplete) -> Result<()> {
        let account = self.current_account().await?;
        self.commit(&account, |ids| {
            ids.insert(channel_id.to_string());
        })
        .await?;
        tracing::info!(account = %account, channel_id, "Subscribed");
        on_complete();
        Ok(())
    }

    async fn unsubscribe(&self, channel_id: &str) -> Result<()> {
        let account = self.current_account().await?;
        self.commit(&account, |ids| {
            ids.remove(channel_id);
        })
        .await?;
        tracing::info!(account = %account, channel_id, "Unsubscribed");
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
