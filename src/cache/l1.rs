//! Per-process bounded LRU cache mapping a fingerprint to a `RecordGroup`
//! (spec.md §4.2, component C). Storage is a `DashMap` for low-contention
//! concurrent reads, the way the teacher's `cache::local_backend::LocalCache`
//! is built; LRU bookkeeping is a per-entry monotonic access counter rather
//! than the teacher's sharded eviction queues
//! (`cache::lockfree_lru::LockFreeLruCache`) — a deliberate simplification
//! (noted in DESIGN.md) that keeps eviction a single linear scan instead of
//! shard-local approximate LRU, trading peak throughput for the strict,
//! deterministic ordering spec.md §8 tests for.

use super::CacheStats;
use crate::model::RecordGroup;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

struct Entry {
    group: RecordGroup,
    expires_at: Instant,
    last_access: u64,
    inserted_seq: u64,
}

pub struct LocalCache {
    entries: DashMap<String, Entry>,
    max_entries: usize,
    access_counter: AtomicU64,
    insert_counter: AtomicU64,
    stats: Arc<CacheStats>,
}

impl LocalCache {
    pub fn new(max_entries: usize, stats: Arc<CacheStats>) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            access_counter: AtomicU64::new(0),
            insert_counter: AtomicU64::new(0),
            stats,
        }
    }

    /// Returns a miss when absent OR expired; an expired hit is removed
    /// opportunistically (spec.md §4.2).
    pub fn get(&self, key: &str) -> Option<RecordGroup> {
        let now = Instant::now();
        if let Some(mut entry) = self.entries.get_mut(key) {
            if entry.expires_at < now {
                drop(entry);
                self.entries.remove(key);
                self.stats.record_miss();
                return None;
            }
            entry.last_access = self.access_counter.fetch_add(1, Ordering::Relaxed);
            self.stats.record_hit();
            return Some(entry.group.clone());
        }
        self.stats.record_miss();
        None
    }

    /// Inserts or overwrites, evicting least-recently-used entries until
    /// the map is back within `max_entries` (spec.md §4.2). Ties in
    /// `last_access` are broken by insertion order.
    pub fn set(&self, key: String, group: RecordGroup, ttl: Duration) {
        let last_access = self.access_counter.fetch_add(1, Ordering::Relaxed);
        let inserted_seq = self.insert_counter.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            Entry {
                group,
                expires_at: Instant::now() + ttl,
                last_access,
                inserted_seq,
            },
        );
        self.evict_over_capacity();
    }

    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_over_capacity(&self) {
        while self.entries.len() > self.max_entries {
            let victim = self
                .entries
                .iter()
                .map(|e| (e.key().clone(), e.last_access, e.inserted_seq))
                .min_by_key(|(_, last_access, inserted_seq)| (*last_access, *inserted_seq));
            match victim {
                Some((key, _, _)) => {
                    self.entries.remove(&key);
                    self.stats.record_evictions(1);
                }
                None => break,
            }
        }
    }

    /// Removes every entry whose `expires_at` has passed. Not required for
    /// correctness (lazy expiry on `get` already suffices); bounds memory
    /// under low-read load (spec.md §4.2's background sweep).
    pub fn sweep_expired(&self) {
        let now = Instant::now();
        let mut expired = 0u64;
        self.entries.retain(|_, entry| {
            let keep = entry.expires_at >= now;
            if !keep {
                expired += 1;
            }
            keep
        });
        if expired > 0 {
            self.stats.record_evictions(expired);
            debug!(count = expired, "L1 sweep removed expired entries");
        }
        self.stats.record_cleanup();
        trace!("L1 sweep complete, {} entries remain", self.entries.len());
    }
}
