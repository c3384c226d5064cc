//! In-memory query cache with a staleness window and bounded retries.

use std::{
    collections::HashMap,
    future::Future,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::{config::CacheSettings, error::WeatherError};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    fetched_at: Instant,
}

#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    stale_time: Duration,
    gc_time: Duration,
    retries: u32,
    retry_delay: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time: settings.stale_time(),
            gc_time: settings.gc_time(),
            retries: settings.retries,
            retry_delay: settings.retry_delay(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry so the next fetch goes to the provider.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Serve `key` from cache while fresh, otherwise run `fetcher` (with retries) and store the result.
    pub async fn fetch<F, Fut>(&mut self, key: &str, fetcher: F) -> Result<T, WeatherError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WeatherError>>,
    {
        let gc_time = self.gc_time;
        self.entries.retain(|_, e| e.fetched_at.elapsed() < gc_time);

        if let Some(entry) = self.entries.get(key) {
            if entry.fetched_at.elapsed() < self.stale_time {
                debug!(key, "serving cached response");
                return Ok(entry.data.clone());
            }
        }

        let mut attempt = 0;
        let data = loop {
            match fetcher().await {
                Ok(data) => break data,
                Err(err) if attempt < self.retries && err.is_retryable() => {
                    attempt += 1;
                    warn!(key, attempt, error = %err, "request failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        };

        self.entries.insert(
            key.to_string(),
            CacheEntry { data: data.clone(), fetched_at: Instant::now() },
        );

        Ok(data)
    }
}
