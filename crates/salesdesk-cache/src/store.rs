//! Cache store backends.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CacheEntry, CacheKey, CacheResult};

/// Storage for cached responses.
///
/// One namespace per store. Writes insert or overwrite; entries are never
/// evicted.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>>;

    /// Store an entry under its key, replacing any previous one.
    async fn put(&self, entry: CacheEntry) -> CacheResult<()>;

    /// Keys of all stored entries.
    async fn keys(&self) -> CacheResult<Vec<CacheKey>>;

    /// Number of stored entries.
    async fn len(&self) -> CacheResult<usize> {
        Ok(self.keys().await?.len())
    }
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        (**self).get(key).await
    }

    async fn put(&self, entry: CacheEntry) -> CacheResult<()> {
        (**self).put(entry).await
    }

    async fn keys(&self) -> CacheResult<Vec<CacheKey>> {
        (**self).keys().await
    }

    async fn len(&self) -> CacheResult<usize> {
        (**self).len().await
    }
}

/// In-memory cache store (tests, or caching for a single run).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> CacheResult<()> {
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn keys(&self) -> CacheResult<Vec<CacheKey>> {
        let mut keys: Vec<_> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn len(&self) -> CacheResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use salesdesk_core::{Headers, KeyStrategy};
    use salesdesk_data::{Request, Response};

    use super::*;

    fn entry(url: &str, body: &str) -> CacheEntry {
        let request = Request::get(url);
        let key = CacheKey::for_request(&request, KeyStrategy::MethodUrl);
        let response = Response::new(200, Headers::new(), body.as_bytes().to_vec());
        CacheEntry::from_response(key, &request, &response)
    }

    #[tokio::test]
    async fn test_in_memory_put_get() {
        let store = InMemoryStore::new();
        let e = entry("http://api.test/clients", "[]");

        assert_eq!(store.get(&e.key).await.unwrap(), None);
        store.put(e.clone()).await.unwrap();
        assert_eq!(store.get(&e.key).await.unwrap(), Some(e));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_overwrite() {
        let store = InMemoryStore::new();
        let first = entry("http://api.test/clients", "old");
        let second = entry("http://api.test/clients", "new");

        store.put(first).await.unwrap();
        store.put(second.clone()).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec![second.key.clone()]);
        assert_eq!(store.get(&second.key).await.unwrap().unwrap().body, b"new");
    }

    #[tokio::test]
    async fn test_arc_store_shares_entries() {
        let store = Arc::new(InMemoryStore::new());
        let shared = Arc::clone(&store);
        shared.put(entry("http://api.test/users", "[]")).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
