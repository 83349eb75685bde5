//! Single-slot read-through cache.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::result::CacheResult;

struct Entry<T> {
  data: Arc<T>,
  fetched_at: Instant,
  cached_at: DateTime<Utc>,
}

impl<T> Clone for Entry<T> {
  fn clone(&self) -> Self {
    Self {
      data: Arc::clone(&self.data),
      fetched_at: self.fetched_at,
      cached_at: self.cached_at,
    }
  }
}

/// Time-boxed memoization of one parameterless query.
///
/// The slot lock only guards reads and writes of the slot, never the fetch
/// itself: concurrent misses each hit the network and the last response to
/// land wins.
pub struct FetchCache<T> {
  slot: Mutex<Option<Entry<T>>>,
  /// How long fetched data is served without a network call
  freshness: Duration,
}

impl<T> FetchCache<T> {
  pub fn new(freshness: Duration) -> Self {
    Self {
      slot: Mutex::new(None),
      freshness,
    }
  }

  pub fn freshness(&self) -> Duration {
    self.freshness
  }

  fn snapshot(&self) -> Option<Entry<T>> {
    self
      .slot
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .clone()
  }

  fn store(&self, data: Arc<T>) {
    let entry = Entry {
      data,
      fetched_at: Instant::now(),
      cached_at: Utc::now(),
    };
    *self
      .slot
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(entry);
  }

  /// Whether a call right now would be served without the network.
  pub fn is_fresh(&self) -> bool {
    self
      .snapshot()
      .is_some_and(|entry| entry.fetched_at.elapsed() < self.freshness)
  }

  /// Read through the cache.
  ///
  /// 1. Slot fresh: return it, `fetcher` is not called
  /// 2. Otherwise call `fetcher`; on success replace the slot
  /// 3. On failure fall back to the slot even if expired
  /// 4. No slot at all: the fetch error is returned
  pub async fn fetch<F, Fut, E>(&self, fetcher: F) -> Result<CacheResult<Arc<T>>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
  {
    if let Some(entry) = self.snapshot() {
      if entry.fetched_at.elapsed() < self.freshness {
        debug!("cache hit");
        return Ok(CacheResult::from_cache(entry.data, entry.cached_at));
      }
      debug!("cache expired, refreshing");
    }

    match fetcher().await {
      Ok(data) => {
        let data = Arc::new(data);
        self.store(Arc::clone(&data));
        info!("cache refreshed");
        Ok(CacheResult::from_network(data))
      }
      Err(err) => match self.snapshot() {
        Some(entry) => {
          warn!(error = %err, cached_at = %entry.cached_at, "fetch failed, serving cached data");
          Ok(CacheResult::offline(entry.data, entry.cached_at))
        }
        None => Err(err),
      },
    }
  }
}
