//! Cached wrapper around [`BackofficeClient`].

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::Company;
use crate::cache::{CacheResult, FetchCache};

/// Client that serves the company list from a [`FetchCache`].
///
/// Every other call goes straight through to the inner client via `Deref`.
/// Clones share the same cache slot.
#[derive(Clone)]
pub struct CachedBackofficeClient {
  inner: BackofficeClient,
  companies: Arc<FetchCache<Vec<Company>>>,
}

impl CachedBackofficeClient {
  pub fn new(inner: BackofficeClient, freshness: Duration) -> Self {
    Self {
      inner,
      companies: Arc::new(FetchCache::new(freshness)),
    }
  }

  /// Every company, from the cache when fresh.
  ///
  /// Fails only when the network call fails and nothing was cached before.
  pub async fn get_all_companies(&self) -> Result<Arc<Vec<Company>>, ApiError> {
    Ok(self.get_all_companies_with_source().await?.data)
  }

  /// Same as [`get_all_companies`](Self::get_all_companies), tagged with where the data came from.
  pub async fn get_all_companies_with_source(
    &self,
  ) -> Result<CacheResult<Arc<Vec<Company>>>, ApiError> {
    let client = self.inner.clone();
    self
      .companies
      .fetch(|| async move { client.get_all_companies().await })
      .await
  }
}

impl Deref for CachedBackofficeClient {
  type Target = BackofficeClient;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}
