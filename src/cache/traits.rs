//! Cache store trait definition
//!
//! This module defines the `CacheStore` trait that all store implementations
//! must satisfy. The trait provides a common interface for the memory and
//! disk stores: a namespaced key-value map from request identity to captured
//! response.
//!
//! Namespaces partition entries by deployed version (`prefix-version`); the
//! lifecycle controller keeps exactly one namespace current and deletes the
//! rest at activation.

use async_trait::async_trait;

use super::entry::{CacheEntry, CacheKey};
use super::error::CacheError;
use super::stats::CacheStats;

/// Cache store trait for the memory and disk implementations
///
/// Concurrency contract: safe for concurrent reads and concurrent
/// independent-key writes; a write is a whole-entry replacement, so the
/// last writer for a given key wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open a namespace, creating it if absent. Idempotent.
    async fn open(&self, namespace: &str) -> Result<(), CacheError>;

    /// Store an entry under a namespace, replacing any prior value for the key
    ///
    /// The store accepts whatever it is handed; the qualifying-response
    /// check (2xx, same-origin, basic) lives at the call sites.
    async fn put(
        &self,
        namespace: &str,
        key: CacheKey,
        entry: CacheEntry,
    ) -> Result<(), CacheError>;

    /// Exact-key lookup. A miss is `Ok(None)`, not an error.
    async fn lookup(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Result<Option<CacheEntry>, CacheError>;

    /// Enumerate all namespaces ever opened and not yet deleted
    async fn list_namespaces(&self) -> Result<Vec<String>, CacheError>;

    /// Remove a namespace and all its entries
    ///
    /// Idempotent: deleting an absent namespace is a no-op and returns false.
    async fn delete_namespace(&self, namespace: &str) -> Result<bool, CacheError>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Run pending async tasks (for stores with async backends like moka)
    /// Default implementation is a no-op
    async fn run_pending_tasks(&self) {
        // No-op by default
    }
}
