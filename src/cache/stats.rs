//! Cache statistics
//!
//! Hit/miss/eviction counters shared by the store implementations.
//! Trackers use atomics so concurrent lookups never contend on a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cache store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub current_item_count: u64,
    pub current_size_bytes: u64,
}

/// Statistics tracker using atomics for thread safety
pub(crate) struct CacheStatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStatsTracker {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_evictions(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics
    pub fn snapshot(&self, current_item_count: u64, current_size_bytes: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            current_item_count,
            current_size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_at_zero() {
        let tracker = CacheStatsTracker::new();
        assert_eq!(tracker.snapshot(0, 0), CacheStats::default());
    }

    #[test]
    fn test_tracker_increments_counters() {
        let tracker = CacheStatsTracker::new();
        tracker.increment_hits();
        tracker.increment_hits();
        tracker.increment_misses();
        tracker.increment_evictions();

        let stats = tracker.snapshot(3, 1024);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.current_item_count, 3);
        assert_eq!(stats.current_size_bytes, 1024);
    }
}
