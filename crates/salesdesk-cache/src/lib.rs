//! Offline-capable HTTP response cache for SalesDesk.
//!
//! This crate provides:
//! - `RequestCache` - Intercepts requests, serving stored responses and storing network ones
//! - `CacheKey` - Deterministic key from method and URL (optionally body)
//! - `CacheStore` - Storage trait, with `InMemoryStore` and the persistent `FileStore`
//! - `CacheStats` - Hit/miss/failure counters
//!
//! # Example
//!
//! ```ignore
//! use salesdesk_cache::{FileStore, RequestCache};
//! use salesdesk_data::{HttpTransport, Request};
//!
//! let store = FileStore::open("/var/cache/salesdesk", "api-cache")?;
//! let cache = RequestCache::new(store, HttpTransport::new()?);
//!
//! // Served from disk on the second call, even with the backend down.
//! let response = cache.intercept(&Request::get("http://localhost:4000/api/products")).await;
//! ```

mod entry;
mod error;
mod file;
mod interceptor;
mod key;
mod stats;
mod store;

pub use entry::*;
pub use error::*;
pub use file::*;
pub use interceptor::*;
pub use key::*;
pub use stats::*;
pub use store::*;
