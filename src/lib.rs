//! Terminal backoffice for the company-intelligence and subscription platform.
//!
//! `api`, `cache` and `table` are usable on their own: a typed client for
//! every backend endpoint, the single-slot fetch cache in front of the
//! company list, and the table engine that turns opaque company records
//! into searchable, sortable rows. The remaining modules are the terminal UI
//! driven by the `backoffice` binary.

pub mod api;
pub mod app;
pub mod cache;
pub mod commands;
pub mod config;
pub mod event;
pub mod logging;
pub mod query;
pub mod table;
pub mod ui;

pub use api::{ApiError, BackofficeClient, CachedBackofficeClient};
pub use cache::{CacheResult, CacheSource, FetchCache};
pub use config::Config;
pub use table::{ColumnKey, ViewState};
