use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct CachedValue<V> {
    value: V,
    fetched_at: Instant,
}

/// Single-slot cache guarding one upstream feed behind a freshness window.
///
/// The slot is overwritten on every successful refresh and never cleared, so
/// stale data stays available as a fallback for failed refreshes.
pub struct FeedCache<V>
where
    V: Clone + Send + 'static,
{
    name: &'static str,
    window: Duration,
    slot: Mutex<Option<CachedValue<V>>>,
}

impl<V> FeedCache<V>
where
    V: Clone + Send,
{
    pub fn new(name: &'static str, window: Duration) -> Self {
        Self {
            name,
            window,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value while it is fresh, otherwise refreshes via
    /// `refresh`. A failed refresh falls back to the stale value when one
    /// exists; the error surfaces only on a cold slot.
    ///
    /// The slot lock is held across the refresh so concurrent readers of an
    /// expired slot cannot issue duplicate upstream calls.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<V>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V>> + Send,
    {
        let mut slot = self.slot.lock().await;
        if let Some(entry) = slot.as_ref() {
            if entry.fetched_at.elapsed() < self.window {
                debug!("Cache HIT for feed: {}", self.name);
                return Ok(entry.value.clone());
            }
        }
        debug!("Cache MISS for feed: {}", self.name);

        match refresh().await {
            Ok(value) => {
                *slot = Some(CachedValue {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(value)
            }
            Err(e) => match slot.as_ref() {
                Some(entry) => {
                    warn!("Refresh failed for feed {}, serving stale data: {e:#}", self.name);
                    Ok(entry.value.clone())
                }
                None => Err(e),
            },
        }
    }
}
