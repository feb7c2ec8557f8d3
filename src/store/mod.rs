pub mod memory;
pub mod sql;

use crate::error::Result;
use crate::model::{DnsRecord, LookupQuery, RecordGroup, RecordType};
use async_trait::async_trait;

/// Durable mapping from `(name, type)` to an ordered set of records
/// (spec.md §4.1, component A). `async_trait` matches the teacher's
/// pattern for its cache backends (`cache/redis_backend.rs::CacheBackend`).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records for `(name, type)` sharing the minimum priority,
    /// ordered by ascending id. Must be a single logical read observing a
    /// consistent snapshot — no split between "find min" and "fetch rows".
    async fn lookup_group(&self, query: &LookupQuery) -> Result<Option<RecordGroup>>;

    /// All records for `(name, type)`, ordered by priority ascending then
    /// id ascending.
    async fn lookup_all(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>>;

    /// Fetches a single record by its stable id, used by the resolver to
    /// materialize a wildcard pattern's `payload_record_id` (spec.md §4.6)
    /// once the engine has picked a winner.
    async fn get_by_id(&self, id: u64) -> Result<Option<DnsRecord>>;

    async fn create(&self, record: DnsRecord) -> Result<DnsRecord>;

    async fn update(&self, record: DnsRecord) -> Result<DnsRecord>;

    /// Deletes by id and returns the removed record so the tiered cache
    /// facade can compute its invalidation key without a prior read
    /// (spec.md §9's recommended resolution to the delete-by-id
    /// invalidation open question).
    async fn delete(&self, id: u64) -> Result<Option<DnsRecord>>;

    /// Deletes every record for `name`, optionally restricted to one type.
    /// Returns the `(name, type)` pairs that were actually touched, so the
    /// facade knows what to invalidate.
    async fn delete_name_type(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordType>>;

    async fn health(&self) -> Result<()>;
}
