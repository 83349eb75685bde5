//! Background requests for views.
//!
//! A view owns a `Query`, starts it once and calls `poll` from `tick()`.
//! The last successful value stays readable while a reload runs and after
//! a reload fails, so a table keeps its rows when `r` hits a dead network.

use crate::api::ApiError;
use crate::cache::{CacheResult, CacheSource};
use chrono::{DateTime, Local, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

type Fetcher<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// One remote read (or write) whose result a view renders.
///
/// Dropping the query or calling `reload` aborts the running task, so a
/// late response never reaches a view that moved on.
pub struct Query<T> {
  fetcher: Fetcher<T>,
  task: Option<JoinHandle<Result<T, ApiError>>>,
  data: Option<T>,
  error: Option<ApiError>,
  loaded_at: Option<DateTime<Local>>,
}

impl<T: Send + 'static> Query<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
  {
    Self {
      fetcher: Box::new(move || fetcher().boxed()),
      task: None,
      data: None,
      error: None,
      loaded_at: None,
    }
  }

  /// Starts a request unless one is already running.
  pub fn start(&mut self) {
    if self.task.is_none() {
      self.spawn();
    }
  }

  /// Aborts the running request, if any, and starts a new one.
  pub fn reload(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
    self.spawn();
  }

  fn spawn(&mut self) {
    self.error = None;
    self.task = Some(tokio::spawn((self.fetcher)()));
  }

  /// Collects a finished request. Returns `true` when data or error changed.
  pub fn poll(&mut self) -> bool {
    let Some(mut task) = self.task.take() else {
      return false;
    };
    if !task.is_finished() {
      self.task = Some(task);
      return false;
    }
    let Some(joined) = (&mut task).now_or_never() else {
      self.task = Some(task);
      return false;
    };

    match joined {
      Ok(Ok(data)) => {
        self.data = Some(data);
        self.loaded_at = Some(Local::now());
      }
      Ok(Err(e)) => {
        warn!(error = %e, "request failed");
        self.error = Some(e);
      }
      Err(e) => {
        warn!(error = %e, "request task did not finish");
        self.error = Some(ApiError::Configuration(format!("request task failed: {}", e)));
      }
    }
    true
  }
}

impl<T> Query<T> {
  pub fn is_loading(&self) -> bool {
    self.task.is_some()
  }

  /// Last successful value.
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  /// Error of the latest request. Cleared when a new request starts.
  pub fn error(&self) -> Option<&ApiError> {
    self.error.as_ref()
  }

  pub fn loaded_at(&self) -> Option<DateTime<Local>> {
    self.loaded_at
  }
}

impl<T> Query<CacheResult<T>> {
  pub fn source(&self) -> Option<CacheSource> {
    self.data.as_ref().map(|result| result.source)
  }

  /// When the slot was filled, for data served from the cache.
  pub fn cached_at(&self) -> Option<DateTime<Utc>> {
    self.data.as_ref().and_then(|result| result.cached_at)
  }
}

impl<T> Drop for Query<T> {
  fn drop(&mut self) {
    if let Some(task) = &self.task {
      task.abort();
    }
  }
}
