//! Account registry and the `AccountProvider` seam

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::observable::Observable;
use super::types::{Account, Capabilities, ServiceKind};

/// Read access to the active account, as consumed by the resolvers
pub trait AccountProvider {
    fn current(&self) -> Option<Account>;

    /// True when no account is configured at all
    fn is_empty(&self) -> bool;

    /// Capabilities of the active service; all false without a current account
    fn capabilities(&self) -> Capabilities {
        self.current().map(|a| a.capabilities()).unwrap_or_default()
    }

    /// A non-anonymous account is active
    fn signed_in(&self) -> bool {
        self.current().is_some_and(|a| !a.anonymous)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsFile {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub current: Option<String>,
}

/// All configured accounts plus an observable current-account slot
pub struct AccountsModel {
    accounts: Vec<Account>,
    current: Observable<Option<Account>>,
}

impl AccountsModel {
    pub fn new(accounts: Vec<Account>, current_id: Option<&str>) -> Self {
        let current = current_id
            .and_then(|id| accounts.iter().find(|a| a.id == id))
            .or_else(|| accounts.first())
            .cloned();
        Self {
            accounts,
            current: Observable::new(current),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No accounts file, using demo accounts");
            return Ok(Self::new(demo_accounts(), None));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading accounts from {}", path.display()))?;
        let file: AccountsFile = serde_json::from_str(&content)
            .with_context(|| format!("parsing accounts from {}", path.display()))?;
        Ok(Self::new(file.accounts, file.current.as_deref()))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.get().map(|a| a.id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Account>> {
        self.current.subscribe()
    }

    /// Make `id` the current account. Returns false for an unknown id.
    pub fn switch_to(&self, id: &str) -> bool {
        match self.accounts.iter().find(|a| a.id == id) {
            Some(account) => {
                tracing::info!(account = %account.id, service = %account.service, "Switching account");
                self.current.set(Some(account.clone()));
                true
            }
            None => false,
        }
    }

    /// Advance to the next configured account, wrapping around
    pub fn switch_to_next(&self) -> Option<Account> {
        if self.accounts.is_empty() {
            return None;
        }
        let index = self
            .current_id()
            .and_then(|id| self.accounts.iter().position(|a| a.id == id))
            .map(|i| (i + 1) % self.accounts.len())
            .unwrap_or(0);
        let next = self.accounts[index].clone();
        self.switch_to(&next.id);
        Some(next)
    }
}

impl AccountProvider for AccountsModel {
    fn current(&self) -> Option<Account> {
        self.current.get()
    }

    fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

pub fn demo_accounts() -> Vec<Account> {
    vec![
        Account {
            id: "invidious-demo".to_string(),
            name: "demo".to_string(),
            service: ServiceKind::Invidious,
            instance_url: "https://invidious.example.org".to_string(),
            anonymous: false,
            capabilities: None,
        },
        Account {
            id: "piped-public".to_string(),
            name: "Public".to_string(),
            service: ServiceKind::Piped,
            instance_url: "https://piped.example.org".to_string(),
            anonymous: true,
            capabilities: None,
        },
    ]
}
