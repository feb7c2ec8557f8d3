pub mod facade;
pub mod l1;
pub mod l2;

pub use facade::TieredCache;
pub use l1::LocalCache;
pub use l2::{L2Cache, RedisCache};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Shared hit/miss/eviction counters, read by `metrics::CoreMetrics` and by
/// the `/metrics` HTTP surface. Atomics rather than a mutex, per spec.md
/// §5: cache counters "may be updated via atomic increments and need not
/// be serialized with a lock" — mirrors the teacher's widespread use of
/// plain atomics for hot-path counters (e.g. `metrics.rs`, `cache/mod.rs`).
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    last_cleanup_at: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, n: u64) {
        self.evictions.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_cleanup(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.last_cleanup_at.store(now, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStatsSnapshot {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            last_cleanup_at: self.last_cleanup_at.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub last_cleanup_at: u64,
    pub hit_rate: f64,
}

/// TTL derivation helper shared by the read-through path (spec.md §4.4):
/// `ttl_L1 = floor(record_ttl / 10)`, `ttl_L2 = floor(record_ttl / 2)`.
pub fn l1_ttl_secs(record_ttl: u32) -> u64 {
    (record_ttl / 10) as u64
}

pub fn l2_ttl_secs(record_ttl: u32) -> u64 {
    (record_ttl / 2) as u64
}
