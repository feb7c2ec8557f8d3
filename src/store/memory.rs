//! Reference `RecordStore` implementation: an in-process map guarded by a
//! single `parking_lot::RwLock`, so `lookup_group`'s "find min, fetch rows"
//! step is always one consistent snapshot. Grounded on the teacher's
//! `zone::store::ZoneStore` (an `RwLock<HashMap<String, Zone>>`), adapted
//! from "one zone per origin" to "one record list per (name, type)".
//!
//! Used as the default L3 in tests and examples; a real deployment
//! supplies its own `RecordStore` over the persistent schema described in
//! `store::sql`.

use super::RecordStore;
use crate::error::{CoreError, Result};
use crate::model::{DnsRecord, LookupQuery, RecordGroup, RecordType};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

type Key = (String, RecordType);

pub struct MemoryStore {
    records: RwLock<HashMap<Key, Vec<DnsRecord>>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn key_for(name: &str, record_type: RecordType) -> Key {
        (DnsRecord::normalize_name(name), record_type)
    }

    /// Assigns an id if the record doesn't already carry a non-zero one;
    /// lets tests seed specific ids via `create` while the allocator keeps
    /// handing out fresh ones for everything else.
    fn allocate_id(&self, requested: u64) -> u64 {
        if requested != 0 {
            let mut current = self.next_id.load(Ordering::Relaxed);
            while requested >= current {
                match self.next_id.compare_exchange_weak(
                    current,
                    requested + 1,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break,
                    Err(observed) => current = observed,
                }
            }
            requested
        } else {
            self.next_id.fetch_add(1, Ordering::Relaxed)
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn lookup_group(&self, query: &LookupQuery) -> Result<Option<RecordGroup>> {
        let key = Self::key_for(&query.name, query.record_type);
        let records = self.records.read();
        match records.get(&key) {
            Some(rows) if !rows.is_empty() => Ok(RecordGroup::from_records(rows.clone())),
            _ => Ok(None),
        }
    }

    async fn lookup_all(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>> {
        let key = Self::key_for(&query.name, query.record_type);
        let records = self.records.read();
        let mut rows = records.get(&key).cloned().unwrap_or_default();
        rows.sort_by_key(|r| (r.priority, r.id));
        Ok(rows)
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<DnsRecord>> {
        let records = self.records.read();
        Ok(records
            .values()
            .flatten()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create(&self, mut record: DnsRecord) -> Result<DnsRecord> {
        record.name = DnsRecord::normalize_name(&record.name);
        record.id = self.allocate_id(record.id);
        let key = (record.name.clone(), record.record_type);
        let mut records = self.records.write();
        records.entry(key).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, mut record: DnsRecord) -> Result<DnsRecord> {
        record.name = DnsRecord::normalize_name(&record.name);
        let key = (record.name.clone(), record.record_type);
        let mut records = self.records.write();
        let rows = records.entry(key).or_default();
        match rows.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(CoreError::NotFound),
        }
    }

    async fn delete(&self, id: u64) -> Result<Option<DnsRecord>> {
        let mut records = self.records.write();
        for rows in records.values_mut() {
            if let Some(pos) = rows.iter().position(|r| r.id == id) {
                return Ok(Some(rows.remove(pos)));
            }
        }
        Ok(None)
    }

    async fn delete_name_type(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordType>> {
        let normalized = DnsRecord::normalize_name(name);
        let mut records = self.records.write();
        let mut touched = Vec::new();
        match record_type {
            Some(t) => {
                let key = (normalized, t);
                if records.remove(&key).is_some() {
                    touched.push(t);
                }
            }
            None => {
                let keys: Vec<Key> = records
                    .keys()
                    .filter(|(n, _)| *n == normalized)
                    .cloned()
                    .collect();
                for key in keys {
                    records.remove(&key);
                    touched.push(key.1);
                }
            }
        }
        Ok(touched)
    }

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordData;
    use std::net::Ipv4Addr;

    fn a_record(id: u64, name: &str, ip: &str, priority: u32) -> DnsRecord {
        DnsRecord::new(
            id,
            name,
            RecordType::A,
            RecordData::A(ip.parse::<Ipv4Addr>().unwrap()),
            300,
            priority,
        )
    }

    #[tokio::test]
    async fn create_then_lookup_group_contains_record() {
        let store = MemoryStore::new();
        let r = a_record(1, "www.test.internal", "10.0.0.1", 10);
        store.create(r.clone()).await.unwrap();

        let query = LookupQuery::new("www.test.internal", RecordType::A);
        let group = store.lookup_group(&query).await.unwrap().unwrap();
        assert_eq!(group.records.len(), 1);
        assert_eq!(group.records[0].id, r.id);
    }

    #[tokio::test]
    async fn lookup_group_only_returns_minimum_priority() {
        let store = MemoryStore::new();
        store
            .create(a_record(1, "priority-test.internal", "10.0.2.20", 10))
            .await
            .unwrap();
        store
            .create(a_record(2, "priority-test.internal", "10.0.2.21", 10))
            .await
            .unwrap();
        store
            .create(a_record(3, "priority-test.internal", "10.0.2.30", 20))
            .await
            .unwrap();

        let query = LookupQuery::new("priority-test.internal", RecordType::A);
        let group = store.lookup_group(&query).await.unwrap().unwrap();
        assert_eq!(group.records.len(), 2);
        assert!(group.records.iter().all(|r| r.priority == 10));
    }

    #[tokio::test]
    async fn delete_by_id_returns_removed_record_and_omits_it_afterward() {
        let store = MemoryStore::new();
        let r = a_record(1, "www.test.internal", "10.0.0.1", 10);
        store.create(r.clone()).await.unwrap();

        let deleted = store.delete(r.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, r.id);

        let query = LookupQuery::new("www.test.internal", RecordType::A);
        assert!(store.lookup_group(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_name_type_none_removes_every_type_for_name() {
        let store = MemoryStore::new();
        store
            .create(a_record(1, "multi.test.internal", "10.0.0.1", 10))
            .await
            .unwrap();
        store
            .create(DnsRecord::new(
                2,
                "multi.test.internal",
                RecordType::Txt,
                RecordData::Txt(vec!["hello".to_string()]),
                300,
                10,
            ))
            .await
            .unwrap();

        let touched = store.delete_name_type("multi.test.internal", None).await.unwrap();
        assert_eq!(touched.len(), 2);

        let query = LookupQuery::new("multi.test.internal", RecordType::A);
        assert!(store.lookup_group(&query).await.unwrap().is_none());
    }
}
