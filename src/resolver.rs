//! Per-query-type resolution (spec.md §4.7, component G): dispatches on
//! `RecordType` atop the tiered cache facade (D) and the wildcard engine
//! (F). Grounded on the teacher's `resolver.rs::DnsResolver::resolve`
//! dispatch shape, stripped of recursive/forwarding lookup (a non-goal
//! here) and rebuilt around the store+cache+selector+wildcard pipeline.

use crate::error::{CoreError, Result};
use crate::model::{DnsRecord, LookupQuery, RecordType};
use crate::selector::Selector;
use crate::store::RecordStore;
use crate::wildcard::WildcardEngine;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct Resolver {
    cache: Arc<dyn RecordStore>,
    wildcard: Arc<WildcardEngine>,
    selector: Selector,
}

impl Resolver {
    pub fn new(cache: Arc<dyn RecordStore>, wildcard: Arc<WildcardEngine>, selector: Selector) -> Self {
        Self {
            cache,
            wildcard,
            selector,
        }
    }

    /// Resolves `query` to an ordered answer set, or `CoreError::NotFound`
    /// if nothing answers it at any level.
    pub async fn resolve(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>> {
        match query.record_type {
            RecordType::Soa => self.resolve_soa(query).await,
            RecordType::Mx | RecordType::Ns | RecordType::Srv => self.resolve_multi_answer(query).await,
            other => self.resolve_single_answer(query, other).await,
        }
    }

    /// Walks the name's suffix hierarchy from most-specific to
    /// least-specific, returning the first SOA found with its `name`
    /// rewritten to the original query name (spec.md §4.7).
    async fn resolve_soa(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>> {
        for ancestor in suffix_chain(&query.name) {
            let ancestor_query = LookupQuery::new(&ancestor, RecordType::Soa);
            if let Some(group) = self.cache.lookup_group(&ancestor_query).await? {
                if let Some(record) = group.records.into_iter().next() {
                    trace!(name = %query.name, soa_owner = %ancestor, "SOA walk hit");
                    let mut rewritten = record;
                    rewritten.name = query.name.clone();
                    return Ok(vec![rewritten]);
                }
            }
        }
        Err(CoreError::NotFound)
    }

    /// MX/NS/SRV: the full group, ordered by (priority asc, id asc).
    async fn resolve_multi_answer(&self, query: &LookupQuery) -> Result<Vec<DnsRecord>> {
        let records = self.cache.lookup_all(query).await?;
        if records.is_empty() {
            return Err(CoreError::NotFound);
        }
        Ok(records)
    }

    /// All other types: the selector reduces the group to one record,
    /// falling back to the wildcard engine on an exact-match miss for
    /// wildcard-eligible types.
    async fn resolve_single_answer(
        &self,
        query: &LookupQuery,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>> {
        if let Some(group) = self.cache.lookup_group(query).await? {
            if !group.is_empty() {
                let type_tag = record_type.to_string();
                if let Some(record) = self.selector.select(&group, &query.name, &type_tag) {
                    debug!(name = %query.name, record_type = %type_tag, "exact match resolved");
                    return Ok(vec![record.clone()]);
                }
            }
        }

        if record_type.supports_wildcard() {
            if let Some(payload_id) = self.wildcard.resolve(&query.name) {
                if let Some(record) = self.cache.get_by_id(payload_id).await? {
                    debug!(name = %query.name, payload_id, "wildcard fallback resolved");
                    return Ok(vec![record]);
                }
            }
        }

        Err(CoreError::NotFound)
    }
}

/// Yields `name`, then each suffix obtained by stripping the leftmost
/// label, most-specific first. Stops before the empty string, so a name
/// with no ancestors (a single label) yields just itself.
fn suffix_chain(name: &str) -> impl Iterator<Item = String> + '_ {
    let mut current = Some(name);
    std::iter::from_fn(move || {
        let this = current?;
        current = this.split_once('.').map(|(_, rest)| rest);
        Some(this.to_string())
    })
}
