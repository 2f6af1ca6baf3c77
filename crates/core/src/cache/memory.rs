//! In-process generation store.
//!
//! Uses tokio `RwLock`-guarded maps. An optional byte quota makes `put`
//! fail with [`Error::QuotaExceeded`] once the total stored body size would
//! exceed it, mirroring the quota errors of platform storage.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{CacheStorage, EntryMeta, Generation, RequestKey};
use crate::{Error, Response, ResponseSource};

#[derive(Clone)]
struct StoredEntry {
    key: RequestKey,
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
    stored_at: String,
}

type GenerationMap = BTreeMap<Generation, HashMap<String, StoredEntry>>;

/// In-memory [`CacheStorage`].
#[derive(Clone, Default)]
pub struct MemoryStorage {
    generations: Arc<RwLock<GenerationMap>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once `quota_bytes` of bodies are held.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { generations: Arc::default(), quota_bytes: Some(quota_bytes) }
    }

    fn used_bytes(map: &GenerationMap) -> usize {
        map.values().flat_map(|entries| entries.values()).map(|e| e.body.len()).sum()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, generation: &Generation) -> Result<(), Error> {
        self.generations.write().await.entry(generation.clone()).or_default();
        Ok(())
    }

    async fn get(&self, generation: &Generation, key: &RequestKey) -> Result<Option<Response>, Error> {
        let map = self.generations.read().await;
        let entry = map.get(generation).and_then(|entries| entries.get(&key.hash()));
        Ok(entry.map(|e| Response::new(e.status, e.headers.clone(), e.body.clone(), ResponseSource::Cache)))
    }

    async fn put(&self, generation: &Generation, key: &RequestKey, response: Response) -> Result<(), Error> {
        let mut map = self.generations.write().await;
        let hash = key.hash();

        if let Some(quota) = self.quota_bytes {
            let replaced = map
                .get(generation)
                .and_then(|entries| entries.get(&hash))
                .map_or(0, |e| e.body.len());
            let needed = Self::used_bytes(&map) - replaced + response.body_len();
            if needed > quota {
                return Err(Error::QuotaExceeded(format!("{needed} bytes exceeds {quota}")));
            }
        }

        let entry = StoredEntry {
            key: key.clone(),
            status: response.status,
            headers: response.headers.clone(),
            body: response.into_body(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        };
        map.entry(generation.clone()).or_default().insert(hash, entry);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<Generation>, Error> {
        Ok(self.generations.read().await.keys().cloned().collect())
    }

    async fn delete(&self, generation: &Generation) -> Result<bool, Error> {
        Ok(self.generations.write().await.remove(generation).is_some())
    }

    async fn entries(&self, generation: &Generation) -> Result<Vec<EntryMeta>, Error> {
        let map = self.generations.read().await;
        let mut entries: Vec<EntryMeta> = map
            .get(generation)
            .into_iter()
            .flat_map(|entries| entries.values())
            .map(|e| EntryMeta {
                method: e.key.method.clone(),
                url: e.key.url.clone(),
                status: e.status,
                content_type: e
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                    .map(|(_, v)| v.clone()),
                body_len: e.body.len(),
                stored_at: e.stored_at.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;
    use url::Url;

    fn key(path: &str) -> RequestKey {
        RequestKey::from_request(&Request::get(Url::parse(&format!("https://app.test{path}")).unwrap()))
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let store = MemoryStorage::new();
        let v1 = Generation::new("v1").unwrap();
        store.put(&v1, &key("/a.js"), Response::ok("one")).await.unwrap();
        store.put(&v1, &key("/a.js"), Response::ok("two")).await.unwrap();

        assert_eq!(store.entries(&v1).await.unwrap().len(), 1);
        let hit = store.get(&v1, &key("/a.js")).await.unwrap().unwrap();
        assert_eq!(hit.into_text(), "two");
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let store = MemoryStorage::with_quota(4);
        let v1 = Generation::new("v1").unwrap();
        store.put(&v1, &key("/a.js"), Response::ok("abcd")).await.unwrap();

        let err = store.put(&v1, &key("/b.js"), Response::ok("e")).await.unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded(_)));
        assert!(store.get(&v1, &key("/b.js")).await.unwrap().is_none());

        // Replacing an entry only counts the difference.
        store.put(&v1, &key("/a.js"), Response::ok("wxyz")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_generation() {
        let store = MemoryStorage::new();
        let v1 = Generation::new("v1").unwrap();
        store.open(&v1).await.unwrap();
        assert!(store.delete(&v1).await.unwrap());
        assert!(store.keys().await.unwrap().is_empty());
    }
}
