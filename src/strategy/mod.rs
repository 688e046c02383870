//! Fetch strategies
//!
//! Each strategy is a small per-request state machine combining one network
//! attempt with cache reads/writes against the current namespace:
//!
//! - **Network-first** (navigation): live response wins; cache is the
//!   offline fallback, with the app root document as the last resort.
//! - **Cache-first** (static assets): a hit never touches the network;
//!   misses fetch and populate the cache.
//! - **Network-with-fallback** (everything else): uncached pass-through
//!   with a best-effort cache fallback when offline.
//!
//! The current namespace is always passed in by the lifecycle controller;
//! strategies own no version state of their own.

use std::sync::Arc;

use crate::cache::{CacheEntry, CacheKey, CacheStore};
use crate::error::WorkerError;
use crate::fetch::{resolve_url, Fetcher, Request, Response};

/// Root-document fallback candidates for offline navigation, in order
const ROOT_FALLBACKS: [&str; 2] = ["./", "./index.html"];

pub struct StrategyEngine {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    origin: String,
}

impl StrategyEngine {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            origin: origin.into(),
        }
    }

    /// Network-first: navigation requests
    ///
    /// On success the response is returned immediately; the cache write is a
    /// detached background task whose failure is logged, never awaited by the
    /// request path. On network failure: exact cache lookup, then the cached
    /// root document, then a generic failure.
    pub async fn network_first(
        &self,
        namespace: &str,
        request: &Request,
    ) -> Result<Response, WorkerError> {
        let key = CacheKey::from_request(request);

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.qualifies_for_cache() {
                    self.spawn_background_put(namespace, key, CacheEntry::from_response(&response));
                }
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "navigation fetch failed, falling back to cache");

                if let Some(entry) = self.lookup(namespace, &key).await {
                    return Ok(entry.to_response());
                }

                for fallback in ROOT_FALLBACKS {
                    let root_key =
                        CacheKey::new("GET", resolve_url(&self.origin, fallback));
                    if let Some(entry) = self.lookup(namespace, &root_key).await {
                        return Ok(entry.to_response());
                    }
                }

                Err(WorkerError::Network(format!(
                    "offline and no cached document for {}",
                    request.url
                )))
            }
        }
    }

    /// Cache-first: static assets
    ///
    /// A hit returns immediately with no network call. On a miss the asset
    /// is fetched and, if it qualifies, stored; the response is returned
    /// whether or not the store write succeeded. A network failure on a miss
    /// propagates with no further fallback.
    pub async fn cache_first(
        &self,
        namespace: &str,
        request: &Request,
    ) -> Result<Response, WorkerError> {
        let key = CacheKey::from_request(request);

        if let Some(entry) = self.lookup(namespace, &key).await {
            return Ok(entry.to_response());
        }

        let response = self.fetcher.fetch(request).await?;
        if response.qualifies_for_cache() {
            if let Err(err) = self
                .store
                .put(namespace, key, CacheEntry::from_response(&response))
                .await
            {
                tracing::warn!(url = %request.url, error = %err, "cache write failed after asset fetch");
            }
        }
        Ok(response)
    }

    /// Network-with-fallback: uncategorized requests
    ///
    /// Successful responses pass through uncached. On failure, an exact
    /// cache lookup; no root-document fallback.
    pub async fn network_with_fallback(
        &self,
        namespace: &str,
        request: &Request,
    ) -> Result<Response, WorkerError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let key = CacheKey::from_request(request);
                if let Some(entry) = self.lookup(namespace, &key).await {
                    Ok(entry.to_response())
                } else {
                    Err(WorkerError::Network(format!(
                        "{} (no cached copy of {})",
                        err, request.url
                    )))
                }
            }
        }
    }

    /// Cache lookup that degrades store errors to a miss
    ///
    /// A broken store read must not take down a request that the network
    /// or another fallback step could still serve.
    async fn lookup(&self, namespace: &str, key: &CacheKey) -> Option<CacheEntry> {
        match self.store.lookup(namespace, key).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Detached cache write for the network-first path
    ///
    /// The response is returned to the caller without waiting for this task;
    /// the entry is durable only once the task completes.
    fn spawn_background_put(&self, namespace: &str, key: CacheKey, entry: CacheEntry) {
        let store = self.store.clone();
        let namespace = namespace.to_string();
        tokio::spawn(async move {
            if let Err(err) = store.put(&namespace, key.clone(), entry).await {
                tracing::warn!(key = %key, error = %err, "background cache write failed");
            }
        });
    }
}
