//! Polled data hooks.
//!
//! A [`DataHook`] fetches a value for a key immediately, then again on every
//! interval tick, and keeps the latest result. Fetch errors are logged and
//! reset the value to `T::default()`. Changing the key clears the value and
//! restarts polling for the new key; results still in flight for the old key
//! are discarded.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::api_client::ClientError;
use crate::periodic::PeriodicTask;

/// Polling interval used by dashboards for near-real-time counts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Source of the value a hook tracks.
#[async_trait]
pub trait Fetcher<K, T>: Send + Sync {
    async fn fetch(&self, key: &K) -> Result<T, ClientError>;
}

pub struct DataHook<K, T> {
    fetcher: Arc<dyn Fetcher<K, T>>,
    period: Duration,
    key: K,
    /// Bumped on every key change; a fetch only publishes if it still
    /// matches.
    generation: Arc<AtomicU64>,
    value: Arc<watch::Sender<T>>,
    task: Option<PeriodicTask>,
}

impl<K, T> DataHook<K, T>
where
    K: Clone + PartialEq + Debug + Send + Sync + 'static,
    T: Clone + Default + Send + Sync + 'static,
{
    /// Start polling `key` every `period`.
    pub fn start(fetcher: Arc<dyn Fetcher<K, T>>, key: K, period: Duration) -> Self {
        let (value, _) = watch::channel(T::default());
        let mut hook = Self {
            fetcher,
            period,
            key,
            generation: Arc::new(AtomicU64::new(0)),
            value: Arc::new(value),
            task: None,
        };
        hook.spawn();
        hook
    }

    fn spawn(&mut self) {
        let generation = self.generation.load(Ordering::SeqCst);
        let fetcher = Arc::clone(&self.fetcher);
        let key = self.key.clone();
        let current = Arc::clone(&self.generation);
        let value = Arc::clone(&self.value);

        self.task = Some(PeriodicTask::start("data-hook", self.period, move || {
            let fetcher = Arc::clone(&fetcher);
            let key = key.clone();
            let current = Arc::clone(&current);
            let value = Arc::clone(&value);
            async move {
                let result = fetcher.fetch(&key).await;
                if current.load(Ordering::SeqCst) != generation {
                    tracing::debug!(key = ?key, "Discarding result for a stale key");
                    return;
                }
                match result {
                    Ok(fresh) => {
                        value.send_replace(fresh);
                    }
                    Err(e) => {
                        tracing::warn!(key = ?key, error = %e, "Data hook fetch failed");
                        value.send_replace(T::default());
                    }
                }
            }
        }));
    }

    /// The latest value (the default until the first fetch completes).
    pub fn current(&self) -> T {
        self.value.borrow().clone()
    }

    /// Watch for updates.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Switch to a new key. The value resets to the default and a fetch for
    /// the new key starts immediately. Setting the same key is a no-op.
    pub async fn set_key(&mut self, key: K) {
        if key == self.key {
            return;
        }
        if let Some(task) = self.task.take() {
            task.stop().await;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.key = key;
        self.value.send_replace(T::default());
        self.spawn();
    }

    /// Stop polling. The last value stays readable.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.stop().await;
        }
    }
}
