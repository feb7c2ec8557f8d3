//! The tiered cache facade (spec.md §4.4, component D): presents the
//! `RecordStore` contract over L1 → L2(optional) → L3, with read-through
//! population and write-invalidation fan-out. Grounded on the teacher's
//! `cache::redis_backend::LayeredCache`, which plays the same "unify the
//! tiers behind one interface" role for its recursive-resolver cache.

use super::{l1_ttl_secs, l2_ttl_secs, CacheStats, L2Cache, LocalCache};
use crate::error::Result;
use crate::model::{DnsRecord, LookupQuery, RecordGroup, RecordType};
use crate::store::RecordStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct TieredCache {
    l1: Option<Arc<LocalCache>>,
    l2: Option<Arc<dyn L2Cache>>,
    l3: Arc<dyn RecordStore>,
    stats: Arc<CacheStats>,
}

impl TieredCache {
    pub fn new(
        l1: Option<Arc<LocalCache>>,
        l2: Option<Arc<dyn L2Cache>>,
        l3: Arc<dyn RecordStore>,
        stats: Arc<CacheStats>,
    ) -> Self {
        Self { l1, l2, l3, stats }
    }

    pub fn stats(&self) -> Arc<CacheStats> {
        self.stats.clone()
    }

    /// Deletes `(name, type)` from both tiers, L2 before L1
    /// (spec.md §5: deleting L2 first avoids a racing reader repopulating
    /// L1 from a stale L2).
    async fn invalidate(&self, query: &LookupQuery) {
        let key = query.fingerprint();
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2.delete(&[&key]).await {
                warn!(error = %e, key, "L2 invalidation failed, falling through");
            }
        }
        if let Some(l1) = &self.l1 {
            l1.delete(&key);
        }
    }

    async fn invalidate_many(&self, name: &str, types: &[RecordType]) {
        for record_type in types {
            let query = LookupQuery::new(name, *record_type);
            self.invalidate(&query).await;
        }
    }
}

#[async_trait]
impl RecordStore for TieredCache {
    async fn lookup_group(&self, query: &LookupQuery) -> Result<Option<RecordGroup>> {
        let key = query.fingerprint();

        if let Some(l1) = &self.l1 {
            if let Some(group) = l1.get(&key) {
                debug!(key, "L1 hit");
                return Ok(Some(group));
            }
        }

        if let Some(l2) = &self.l2 {
            match l2.get(&key).await {
                Ok(Some(group)) => {
                    debug!(key, "L2 hit");
                    if let Some(l1) = &self.l1 {
                        l1.set(
                            key.clone(),
                            group.clone(),
                            Duration::from_secs(l1_ttl_secs(group.ttl())),
                        );
                    }
                    return Ok(Some(group));
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, key, "L2 read failed, falling through to L3"),
            }
        }

        let group = self.l3.lookup_group(query).await?;
        let group = match group {
            Some(g) if !g.is_empty() => g,
            // Negative answers are never cached at L1/L2 (spec.md §4.4
            // step 4): out of scope per spec.md §9's open question.
            _ => return Ok(None),
        };

        let record_ttl = group.ttl();
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2
                .set(&key, &group, Duration::from_secs(l2_ttl_secs(record_ttl)))
                .await
            {
                warn!(error = %e, key, "L2 populate failed");
            }
        }
        if let Some(l1) = &self.l1 {
            l1.set(
                key.clone(),
                group.clone(),
                Duration::from_secs(l1_ttl_secs(record_ttl)),
            );
        }

        Ok(Some(group))
    }

    async fn lookup_all(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>> {
        // Multi-answer types (MX/NS/SRV) always read through to L3: the
        // cached `RecordGroup` only holds the minimum-priority subset, and
        // ordered multi-answer responses need every record.
        self.l3.lookup_all(query).await
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<DnsRecord>> {
        // Id-keyed lookups have no `(name, type)` cache key to populate;
        // always read through to L3.
        self.l3.get_by_id(id).await
    }

    async fn create(&self, record: DnsRecord) -> Result<DnsRecord> {
        let created = self.l3.create(record).await?;
        let query = LookupQuery::new(&created.name, created.record_type);
        self.invalidate(&query).await;
        Ok(created)
    }

    async fn update(&self, record: DnsRecord) -> Result<DnsRecord> {
        let updated = self.l3.update(record).await?;
        let query = LookupQuery::new(&updated.name, updated.record_type);
        self.invalidate(&query).await;
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<Option<DnsRecord>> {
        let removed = self.l3.delete(id).await?;
        if let Some(record) = &removed {
            let query = LookupQuery::new(&record.name, record.record_type);
            self.invalidate(&query).await;
        }
        Ok(removed)
    }

    async fn delete_name_type(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordType>> {
        let touched = self.l3.delete_name_type(name, record_type).await?;
        match record_type {
            Some(_) => self.invalidate_many(name, &touched).await,
            // A name-only delete invalidates the fixed, enumerated set of
            // "common" types (spec.md §4.4); types outside that set need a
            // scan-based fallback against L2, which is the open question
            // spec.md §4.4 leaves unresolved for non-common types.
            None => self.invalidate_many(name, RecordType::COMMON).await,
        }
        Ok(touched)
    }

    async fn health(&self) -> Result<()> {
        if let Some(l2) = &self.l2 {
            l2.ping().await?;
        }
        self.l3.health().await
    }
}
