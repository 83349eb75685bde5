//! In-memory fetch cache with offline fallback.
//!
//! One slot per cache: the cached query takes no parameters, so there is
//! nothing to key on. A fresh slot is served without touching the network;
//! an expired one is refreshed, and kept around as a fallback when the
//! refresh fails.

mod layer;
mod result;

pub use layer::FetchCache;
pub use result::{CacheResult, CacheSource};
