//! Memory store implementation
//!
//! In-memory `CacheStore` backed by moka, with a namespace registry so
//! `list_namespaces` can enumerate generations that are empty or still
//! being populated. Entries carry no TTL; they live until their namespace
//! is deleted by the lifecycle sweep.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::entry::{CacheEntry, CacheKey};
use super::error::CacheError;
use super::stats::{CacheStats, CacheStatsTracker};
use super::traits::CacheStore;
use crate::config::MemoryStoreConfig;

/// Composite moka key: namespace plus request identity
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct StoreKey {
    namespace: String,
    key: CacheKey,
}

/// MemoryStore wraps moka for our CacheStore trait
pub struct MemoryStore {
    cache: moka::future::Cache<StoreKey, CacheEntry>,
    namespaces: RwLock<BTreeSet<String>>,
    stats: Arc<CacheStatsTracker>,
    max_item_size_bytes: u64,
}

impl MemoryStore {
    /// Create a new MemoryStore from configuration
    pub fn new(config: &MemoryStoreConfig) -> Self {
        let stats = Arc::new(CacheStatsTracker::new());
        let stats_clone = stats.clone();

        let cache = moka::future::Cache::builder()
            .max_capacity(config.max_cache_size_bytes())
            .weigher(|_key, entry: &CacheEntry| {
                let size = entry.size_bytes();
                if size > u32::MAX as usize {
                    u32::MAX
                } else {
                    size as u32
                }
            })
            .eviction_listener(move |_key, _value, cause| {
                use moka::notification::RemovalCause;
                // Explicit removals (namespace deletion) are not evictions
                if cause == RemovalCause::Size {
                    stats_clone.increment_evictions();
                }
            })
            .build();

        Self {
            cache,
            namespaces: RwLock::new(BTreeSet::new()),
            stats,
            max_item_size_bytes: config.max_item_size_bytes(),
        }
    }

    fn register_namespace(&self, namespace: &str) {
        self.namespaces.write().insert(namespace.to_string());
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, namespace: &str) -> Result<(), CacheError> {
        self.register_namespace(namespace);
        Ok(())
    }

    async fn put(
        &self,
        namespace: &str,
        key: CacheKey,
        entry: CacheEntry,
    ) -> Result<(), CacheError> {
        let entry_size = entry.size_bytes() as u64;
        if entry_size > self.max_item_size_bytes {
            return Err(CacheError::StorageFull);
        }

        // A put implies the namespace exists, mirroring open-then-put callers
        self.register_namespace(namespace);

        self.cache
            .insert(
                StoreKey {
                    namespace: namespace.to_string(),
                    key,
                },
                entry,
            )
            .await;
        Ok(())
    }

    async fn lookup(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let store_key = StoreKey {
            namespace: namespace.to_string(),
            key: key.clone(),
        };
        match self.cache.get(&store_key).await {
            Some(entry) => {
                self.stats.increment_hits();
                Ok(Some(entry))
            }
            None => {
                self.stats.increment_misses();
                Ok(None)
            }
        }
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.namespaces.read().iter().cloned().collect())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, CacheError> {
        let existed = self.namespaces.write().remove(namespace);

        // Invalidate every entry under the namespace. moka's iter() returns
        // Arc<K>, so the keys are cloned out before invalidation.
        let keys_to_delete: Vec<StoreKey> = self
            .cache
            .iter()
            .filter(|(k, _)| k.namespace == namespace)
            .map(|(k, _)| (*k).clone())
            .collect();

        for key in keys_to_delete {
            self.cache.invalidate(&key).await;
        }
        self.cache.run_pending_tasks().await;

        Ok(existed)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        Ok(self
            .stats
            .snapshot(self.cache.entry_count(), self.cache.weighted_size()))
    }

    async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    fn store() -> MemoryStore {
        MemoryStore::new(&MemoryStoreConfig::default())
    }

    fn entry(body: &str) -> CacheEntry {
        CacheEntry::new(
            StatusCode::OK,
            vec![("content-type".to_string(), "text/plain".to_string())],
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn test_memory_store_implements_cache_store() {
        fn assert_store<T: CacheStore>() {}
        assert_store::<MemoryStore>();
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_registers_namespace() {
        let store = store();
        store.open("fukurou-v1").await.unwrap();
        store.open("fukurou-v1").await.unwrap();

        assert_eq!(
            store.list_namespaces().await.unwrap(),
            vec!["fukurou-v1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_put_and_lookup() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/style.css");

        store
            .put("fukurou-v1", key.clone(), entry("body{}"))
            .await
            .unwrap();

        let found = store.lookup("fukurou-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from("body{}"));
        assert_eq!(found.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lookup_misses_for_unknown_key() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/missing.css");
        assert!(store.lookup("fukurou-v1", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_namespace_scoped() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/a.js");

        store.put("fukurou-v1", key.clone(), entry("v1")).await.unwrap();

        assert!(store.lookup("fukurou-v2", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_prior_value_for_same_key() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/a.js");

        store.put("fukurou-v1", key.clone(), entry("one")).await.unwrap();
        store.put("fukurou-v1", key.clone(), entry("two")).await.unwrap();

        let found = store.lookup("fukurou-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from("two"));
    }

    #[tokio::test]
    async fn test_delete_namespace_removes_entries_and_listing() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/a.js");

        store.put("fukurou-v1", key.clone(), entry("one")).await.unwrap();
        store.put("fukurou-v2", key.clone(), entry("two")).await.unwrap();

        assert!(store.delete_namespace("fukurou-v1").await.unwrap());

        assert!(store.lookup("fukurou-v1", &key).await.unwrap().is_none());
        assert!(store.lookup("fukurou-v2", &key).await.unwrap().is_some());
        assert_eq!(
            store.list_namespaces().await.unwrap(),
            vec!["fukurou-v2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_absent_namespace_is_noop() {
        let store = store();
        assert!(!store.delete_namespace("fukurou-v9").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_entries_over_max_item_size() {
        let config = MemoryStoreConfig {
            max_item_size_mb: 1,
            max_cache_size_mb: 10,
        };
        let store = MemoryStore::new(&config);
        let key = CacheKey::new("GET", "https://app.example/large.bin");

        let large = CacheEntry::new(
            StatusCode::OK,
            vec![],
            Bytes::from(vec![0u8; 2 * 1024 * 1024]),
        );

        let result = store.put("fukurou-v1", key, large).await;
        assert!(matches!(result, Err(CacheError::StorageFull)));
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let store = store();
        let key = CacheKey::new("GET", "https://app.example/a.js");

        store.lookup("fukurou-v1", &key).await.unwrap(); // miss
        store.put("fukurou-v1", key.clone(), entry("x")).await.unwrap();
        store.lookup("fukurou-v1", &key).await.unwrap(); // hit

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
