//! Offline-first request interception.

use async_trait::async_trait;
use salesdesk_core::{CacheConfig, KeyStrategy, Method};
use salesdesk_data::{FetchError, Request, Response, Transport};
use serde::{Deserialize, Serialize};

use crate::{CacheEntry, CacheKey, CacheStats, CacheStatsSnapshot, CacheStore};

/// Path a request took through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from the store without touching the network.
    Hit,
    /// Fetched from the network and stored.
    Miss,
    /// Method not cacheable, or caching disabled; forwarded as-is.
    Bypass,
    /// The network failed; a synthesized 500 was returned.
    Error,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Bypass => write!(f, "BYPASS"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Response plus how it was produced.
#[derive(Debug, Clone)]
pub struct Intercepted {
    /// The response handed to the caller.
    pub response: Response,
    /// Path taken.
    pub status: CacheStatus,
    /// Key looked up, for cacheable requests.
    pub key: Option<CacheKey>,
}

/// Caching layer between a caller and a transport.
///
/// `GET` and `POST` requests are answered from the store when an entry
/// exists for their key; otherwise they go to the transport and whatever
/// response comes back (any status) is stored. Other methods are forwarded
/// untouched. Transport failures are turned into an empty `500` response and
/// store failures are logged and ignored, so interception itself never
/// fails.
///
/// Concurrent misses for the same key each fetch and each write; the last
/// write wins.
pub struct RequestCache<S, T> {
    store: S,
    transport: T,
    key_strategy: KeyStrategy,
    enabled: bool,
    stats: CacheStats,
}

impl<S: CacheStore, T: Transport> RequestCache<S, T> {
    /// Create a cache over `store` that fetches misses through `transport`.
    pub fn new(store: S, transport: T) -> Self {
        Self {
            store,
            transport,
            key_strategy: KeyStrategy::default(),
            enabled: true,
            stats: CacheStats::default(),
        }
    }

    /// Create a cache configured from the `[cache]` section.
    pub fn from_config(store: S, transport: T, config: &CacheConfig) -> Self {
        Self::new(store, transport)
            .with_key_strategy(config.key_strategy)
            .with_enabled(config.enabled)
    }

    /// Set how keys are derived.
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Turn caching on or off. A disabled cache forwards everything.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Key strategy in use.
    pub fn key_strategy(&self) -> KeyStrategy {
        self.key_strategy
    }

    /// Counters since this cache was created.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether requests with `method` are looked up and stored.
    pub fn is_cacheable(method: Method) -> bool {
        matches!(method, Method::Get | Method::Post)
    }

    /// Key `request` would be stored under, if it is cacheable.
    pub fn key_for(&self, request: &Request) -> Option<CacheKey> {
        (self.enabled && Self::is_cacheable(request.method))
            .then(|| CacheKey::for_request(request, self.key_strategy))
    }

    /// Answer a request from the store or the network.
    pub async fn intercept(&self, request: &Request) -> Response {
        self.intercept_with_status(request).await.response
    }

    /// Like [`intercept`](Self::intercept), also reporting the path taken.
    pub async fn intercept_with_status(&self, request: &Request) -> Intercepted {
        let Some(key) = self.key_for(request) else {
            self.stats.record_bypass();
            return match self.transport.send(request).await {
                Ok(response) => Intercepted {
                    response,
                    status: CacheStatus::Bypass,
                    key: None,
                },
                Err(e) => self.network_failed(request, e, None),
            };
        };

        match self.store.get(&key).await {
            Ok(Some(entry)) => {
                self.stats.record_hit();
                tracing::debug!(method = %request.method, url = %request.url, key = %key, "cache hit");
                return Intercepted {
                    response: entry.to_response(),
                    status: CacheStatus::Hit,
                    key: Some(key),
                };
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.record_storage_error();
                tracing::warn!(key = %key, error = %e, "cache lookup failed, treating as miss");
            }
        }

        self.stats.record_miss();

        match self.transport.send(request).await {
            Ok(response) => {
                let entry = CacheEntry::from_response(key.clone(), request, &response);
                if let Err(e) = self.store.put(entry).await {
                    self.stats.record_storage_error();
                    tracing::warn!(key = %key, error = %e, "failed to store response");
                }
                tracing::debug!(
                    method = %request.method,
                    url = %request.url,
                    key = %key,
                    status = response.status,
                    "cache miss, response stored"
                );
                Intercepted {
                    response,
                    status: CacheStatus::Miss,
                    key: Some(key),
                }
            }
            Err(e) => self.network_failed(request, e, Some(key)),
        }
    }

    fn network_failed(&self, request: &Request, error: FetchError, key: Option<CacheKey>) -> Intercepted {
        self.stats.record_network_failure();
        tracing::warn!(method = %request.method, url = %request.url, error = %error, "network request failed");
        Intercepted {
            response: Response::internal_server_error(),
            status: CacheStatus::Error,
            key,
        }
    }
}

#[async_trait]
impl<S: CacheStore, T: Transport> Transport for RequestCache<S, T> {
    async fn send(&self, request: &Request) -> Result<Response, FetchError> {
        Ok(self.intercept(request).await)
    }
}
