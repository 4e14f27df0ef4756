//! Time-bounded in-process caches for expensive upstream calls.
//!
//! Entries expire a fixed duration after insertion and are only checked at
//! read time; nothing sweeps the map in the background. An entry that is never
//! read again is never removed, so the map grows with the number of distinct
//! inputs seen during the process lifetime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

/// Default lifetime of a cached embedding vector.
pub const EMBEDDING_TTL: Duration = Duration::from_secs(60 * 60);
/// Default lifetime of a cached requirement analysis.
pub const REQUIREMENTS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Hit and miss counters for a single cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// A concurrency-safe map whose entries expire `ttl` after insertion.
///
/// Concurrent `put`s for the same key race and the last writer wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if it was inserted less than `ttl` ago.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock();
        let fresh = entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());

        let counter = if fresh.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        fresh
    }

    /// Inserts or overwrites `key`, restarting its lifetime.
    pub fn put(&self, key: String, value: V) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// Cache key for free text: SHA-256 of the lowercased, whitespace-collapsed input.
pub fn content_key(text: &str) -> String {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_content_key_ignores_case_and_spacing() {
        assert_eq!(
            content_key("Senior  Rust\nEngineer"),
            content_key("senior rust engineer ")
        );
        assert_ne!(content_key("rust"), content_key("go"));
    }

    #[test]
    fn test_content_key_is_hex_sha256() {
        let key = content_key("python");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_before_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 7_u32);
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k"), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_at_and_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 7_u32);
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("k"), None);
        // expired entries stay until overwritten
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_overwrites_and_restarts_lifetime() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.put("k".to_string(), "old");
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("k".to_string(), "new");
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("k"), Some("new"));
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("missing"), None::<u8>);
        cache.put("k".to_string(), 1_u8);
        assert_eq!(cache.get("k"), Some(1));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.put("k".to_string(), 1_u8);
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_and_writers_share_one_map() {
        const TASKS: u64 = 16;
        const ROUNDS: u64 = 200;
        const KEYS: u64 = 8;

        let cache = Arc::new(TtlCache::new(Duration::from_secs(3600)));
        let handles: Vec<_> = (0..TASKS)
            .map(|task| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let mut reads = Vec::new();
                    for round in 0..ROUNDS {
                        let key = (task + round) % KEYS;
                        // value encodes which key it was written under
                        cache.put(format!("k{key}"), key * 1_000 + task);
                        let read_key = (task * 3 + round) % KEYS;
                        reads.push((read_key, cache.get(&format!("k{read_key}"))));
                        tokio::task::yield_now().await;
                    }
                    reads
                })
            })
            .collect();

        let mut gets = 0;
        for handle in handles {
            for (key, value) in handle.await.unwrap() {
                gets += 1;
                if let Some(value) = value {
                    assert_eq!(value / 1_000, key, "value from another key leaked");
                    assert!(value % 1_000 < TASKS);
                }
            }
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, KEYS as usize);
        assert_eq!(stats.hits + stats.misses, gets);
        for key in 0..KEYS {
            let value = cache.get(&format!("k{key}")).expect("every key was written");
            assert_eq!(value / 1_000, key);
        }
    }
}
