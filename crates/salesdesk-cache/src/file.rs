//! File-backed cache store.
//!
//! Layout: `<dir>/<namespace>/<key>.json`, one JSON document per entry.
//! Entries are written to a temporary file in the same directory and renamed
//! into place, so readers see either the old entry or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::{CacheEntry, CacheError, CacheKey, CacheResult, CacheStore};

const ENTRY_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistent cache store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    namespace: String,
}

impl FileStore {
    /// Open the `namespace` store under `dir`.
    ///
    /// The directory is created on the first write; a missing directory reads
    /// as an empty store.
    pub fn open(dir: impl AsRef<Path>, namespace: &str) -> CacheResult<Self> {
        validate_namespace(namespace)?;
        Ok(Self {
            root: dir.as_ref().join(namespace),
            namespace: namespace.to_string(),
        })
    }

    /// Namespace this store was opened with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Directory holding the entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.as_str(), ENTRY_EXTENSION))
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!(".{}.{}.{}.tmp", key.as_str(), std::process::id(), n))
    }
}

fn validate_namespace(namespace: &str) -> CacheResult<()> {
    let valid = !namespace.is_empty()
        && namespace != "."
        && namespace != ".."
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(CacheError::Open(format!("invalid namespace {:?}", namespace)))
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(&path, e)),
        };

        let entry: CacheEntry =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if &entry.key != key {
            return Err(CacheError::Corrupt {
                key: key.to_string(),
                reason: format!("file holds entry for {}", entry.key),
            });
        }

        Ok(Some(entry))
    }

    async fn put(&self, entry: CacheEntry) -> CacheResult<()> {
        let bytes = serde_json::to_vec_pretty(&entry)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CacheError::io(&self.root, e))?;

        let temp = self.temp_path(&entry.key);
        let path = self.entry_path(&entry.key);

        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(CacheError::io(&temp, e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(CacheError::io(&path, e));
        }

        tracing::debug!(key = %entry.key, path = %path.display(), "cache entry written");
        Ok(())
    }

    async fn keys(&self) -> CacheResult<Vec<CacheKey>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.root, e)),
        };

        let mut keys = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.root, e))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(CacheKey::parse)
            {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
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

    #[test]
    fn test_open_rejects_bad_namespace() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStore::open(dir.path(), "api-cache").is_ok());
        assert!(matches!(FileStore::open(dir.path(), ""), Err(CacheError::Open(_))));
        assert!(matches!(FileStore::open(dir.path(), ".."), Err(CacheError::Open(_))));
        assert!(matches!(FileStore::open(dir.path(), "a/b"), Err(CacheError::Open(_))));
    }

    #[tokio::test]
    async fn test_missing_directory_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("not-yet"), "api-cache").unwrap();
        let e = entry("http://api.test/products", "[]");

        assert_eq!(store.get(&e.key).await.unwrap(), None);
        assert!(store.keys().await.unwrap().is_empty());
        assert!(!store.root().exists());
    }

    #[tokio::test]
    async fn test_put_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "api-cache").unwrap();
        let e = entry("http://api.test/products", "[]");

        store.put(e.clone()).await.unwrap();

        let expected = dir
            .path()
            .join("api-cache")
            .join(format!("{}.json", e.key));
        assert_eq!(store.entry_path(&e.key), expected);
        assert!(expected.exists());
        assert_eq!(store.get(&e.key).await.unwrap(), Some(e.clone()));
        assert_eq!(store.keys().await.unwrap(), vec![e.key]);
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileStore::open(dir.path(), "api-cache").unwrap();
        let b = FileStore::open(dir.path(), "other").unwrap();
        let e = entry("http://api.test/sales", "[]");

        a.put(e.clone()).await.unwrap();
        assert_eq!(b.get(&e.key).await.unwrap(), None);
        assert_eq!(b.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "api-cache").unwrap();
        let e = entry("http://api.test/users", "[]");
        store.put(e.clone()).await.unwrap();

        std::fs::write(store.entry_path(&e.key), b"{ truncated").unwrap();

        assert!(matches!(
            store.get(&e.key).await,
            Err(CacheError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_keys_ignore_stray_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "api-cache").unwrap();
        let e = entry("http://api.test/users", "[]");
        store.put(e.clone()).await.unwrap();

        std::fs::write(store.root().join("notes.txt"), b"x").unwrap();
        std::fs::write(store.root().join("short.json"), b"{}").unwrap();

        assert_eq!(store.keys().await.unwrap(), vec![e.key]);
    }
}
