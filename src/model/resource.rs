//! Loadable resources observed by the views

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::sync::watch;

use super::observable::Observable;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn item(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(item) => Some(item),
            _ => None,
        }
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// A single remote entity plus its load state.
///
/// Loads run on spawned tasks; completions of superseded requests are dropped.
pub struct Resource<T> {
    key: String,
    state: Arc<Observable<LoadState<T>>>,
    latest_request: Arc<AtomicU64>,
    fetch: Fetcher<T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            state: self.state.clone(),
            latest_request: self.latest_request.clone(),
            fetch: self.fetch.clone(),
        }
    }
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(key: impl Into<String>, fetch: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<T>> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            state: Arc::new(Observable::new(LoadState::Idle)),
            latest_request: Arc::new(AtomicU64::new(0)),
            fetch: Arc::new(fetch),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> LoadState<T> {
        self.state.get()
    }

    pub fn item(&self) -> Option<T> {
        self.state.get().item().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.state.subscribe()
    }

    /// Load unless already loaded or loading. Returns whether a load started.
    pub fn load_if_needed(&self) -> bool {
        match self.state.get() {
            LoadState::Loaded(_) | LoadState::Loading => false,
            LoadState::Idle | LoadState::Failed(_) => {
                self.load();
                true
            }
        }
    }

    /// Fetch unconditionally
    pub fn load(&self) {
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.set(LoadState::Loading);
        tracing::debug!(key = %self.key, request, "Resource load started");

        let fut = (self.fetch)();
        let state = self.state.clone();
        let latest = self.latest_request.clone();
        let key = self.key.clone();
        tokio::spawn(async move {
            let result = fut.await;
            if latest.load(Ordering::SeqCst) != request {
                tracing::debug!(key = %key, request, "Dropping superseded resource result");
                return;
            }
            match result {
                Ok(item) => {
                    tracing::debug!(key = %key, "Resource loaded");
                    state.set(LoadState::Loaded(item));
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Resource load failed");
                    state.set(LoadState::Failed(e.to_string()));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::AtomicUsize;

    fn counting_resource(calls: Arc<AtomicUsize>) -> Resource<u32> {
        Resource::new("counter", move || {
            let calls = calls.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) as u32 + 1) }.boxed()
        })
    }

    async fn wait_settled(resource: &Resource<u32>) -> LoadState<u32> {
        let mut rx = resource.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            if !matches!(state, LoadState::Loading) {
                return state;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_if_needed_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resource = counting_resource(calls.clone());

        assert!(resource.load_if_needed());
        assert!(!resource.load_if_needed());
        assert_eq!(wait_settled(&resource).await, LoadState::Loaded(1));

        assert!(!resource.load_if_needed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_always_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resource = counting_resource(calls.clone());

        resource.load();
        wait_settled(&resource).await;
        resource.load();
        assert_eq!(wait_settled(&resource).await, LoadState::Loaded(2));
        assert_eq!(resource.item(), Some(2));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_retryable() {
        let resource: Resource<u32> =
            Resource::new("broken", || async { Err(anyhow::anyhow!("boom")) }.boxed());
        resource.load();
        assert_eq!(wait_settled(&resource).await, LoadState::Failed("boom".into()));
        assert!(resource.load_if_needed());
    }
}
