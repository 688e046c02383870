//! Disk store implementation
//!
//! Durable `CacheStore` backed by the filesystem so precached resources
//! survive process restarts. Layout:
//!
//! ```text
//! <root>/<namespace>/<digest>.body   response body bytes
//! <root>/<namespace>/<digest>.json   entry metadata (key, status, headers)
//! ```
//!
//! Writes go to a temp file first and are renamed into place, metadata
//! last, so a concurrent reader either sees the old entry or the complete
//! new one. Namespace identifiers are trusted to be path-safe; the config
//! layer validates the charset before a namespace ever reaches the store.

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use super::entry::{CacheEntry, CacheKey};
use super::error::CacheError;
use super::stats::{CacheStats, CacheStatsTracker};
use super::traits::CacheStore;
use crate::config::DiskStoreConfig;

/// On-disk entry metadata, stored next to the body file
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: CacheKey,
    status: u16,
    headers: Vec<(String, String)>,
    stored_at_unix_secs: u64,
    body_len: u64,
}

impl EntryMeta {
    fn from_entry(key: &CacheKey, entry: &CacheEntry) -> Self {
        let stored_at_unix_secs = entry
            .stored_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            key: key.clone(),
            status: entry.status.as_u16(),
            headers: entry.headers.clone(),
            stored_at_unix_secs,
            body_len: entry.body.len() as u64,
        }
    }

    fn into_entry(self, body: Bytes) -> Result<CacheEntry, CacheError> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;
        Ok(CacheEntry {
            status,
            headers: self.headers,
            body,
            stored_at: UNIX_EPOCH + Duration::from_secs(self.stored_at_unix_secs),
        })
    }
}

/// Disk-based cache store
pub struct DiskStore {
    root: PathBuf,
    stats: Arc<CacheStatsTracker>,
}

impl DiskStore {
    pub fn new(config: &DiskStoreConfig) -> Self {
        Self {
            root: PathBuf::from(&config.dir),
            stats: Arc::new(CacheStatsTracker::new()),
        }
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    fn entry_paths(&self, namespace: &str, key: &CacheKey) -> (PathBuf, PathBuf) {
        let digest = key.digest();
        let dir = self.namespace_dir(namespace);
        (
            dir.join(format!("{}.json", digest)),
            dir.join(format!("{}.body", digest)),
        )
    }

    async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CacheError> {
        // Append rather than replace the extension so the body and metadata
        // temp files of one entry never collide
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read a file, mapping NotFound to a cache miss
    async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
        match tokio::fs::read(path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn open(&self, namespace: &str) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(self.namespace_dir(namespace)).await?;
        Ok(())
    }

    async fn put(
        &self,
        namespace: &str,
        key: CacheKey,
        entry: CacheEntry,
    ) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(self.namespace_dir(namespace)).await?;

        let (meta_path, body_path) = self.entry_paths(namespace, &key);
        let meta = EntryMeta::from_entry(&key, &entry);
        let meta_json = serde_json::to_vec(&meta)?;

        // Body first, metadata last: readers key off the metadata file
        Self::write_atomic(&body_path, &entry.body).await?;
        Self::write_atomic(&meta_path, &meta_json).await?;
        Ok(())
    }

    async fn lookup(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let (meta_path, body_path) = self.entry_paths(namespace, key);

        let meta_bytes = match Self::read_optional(&meta_path).await? {
            Some(bytes) => bytes,
            None => {
                self.stats.increment_misses();
                return Ok(None);
            }
        };
        let meta: EntryMeta = serde_json::from_slice(&meta_bytes)?;

        let body = match Self::read_optional(&body_path).await? {
            Some(bytes) => Bytes::from(bytes),
            None => {
                // Metadata without a body is an interrupted write
                self.stats.increment_misses();
                return Ok(None);
            }
        };

        self.stats.increment_hits();
        Ok(Some(meta.into_entry(body)?))
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, CacheError> {
        let mut read_dir = match tokio::fs::read_dir(&self.root).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut namespaces = Vec::new();
        while let Some(dir_entry) = read_dir.next_entry().await? {
            if dir_entry.file_type().await?.is_dir() {
                namespaces.push(dir_entry.file_name().to_string_lossy().into_owned());
            }
        }
        namespaces.sort();
        Ok(namespaces)
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, CacheError> {
        match tokio::fs::remove_dir_all(self.namespace_dir(namespace)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut item_count = 0u64;
        let mut size_bytes = 0u64;

        for namespace in self.list_namespaces().await? {
            let mut read_dir = tokio::fs::read_dir(self.namespace_dir(&namespace)).await?;
            while let Some(dir_entry) = read_dir.next_entry().await? {
                let name = dir_entry.file_name();
                let name = name.to_string_lossy();
                if name.ends_with(".json") {
                    item_count += 1;
                } else if name.ends_with(".body") {
                    size_bytes += dir_entry.metadata().await?.len();
                }
            }
        }

        Ok(self.stats.snapshot(item_count, size_bytes))
    }
}
