//! Request Orchestrator (spec.md §4.8, component H): accepts a parsed
//! question, bounds it with a deadline, calls the resolver, and emits an
//! answer set plus status. Grounded on the teacher's `resolver.rs` top-
//! level `resolve` entry point, which wraps per-query work in a timeout
//! and records metrics the same way.

use crate::error::CoreError;
use crate::metrics::CoreMetrics;
use crate::model::{DnsRecord, LookupQuery};
use crate::resolver::Resolver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub enum Outcome {
    Answered(Vec<DnsRecord>),
    NotFound,
    Error(CoreError),
}

pub struct Orchestrator {
    resolver: Arc<Resolver>,
    metrics: Arc<CoreMetrics>,
    deadline: Duration,
}

impl Orchestrator {
    pub fn new(resolver: Arc<Resolver>, metrics: Arc<CoreMetrics>, deadline: Duration) -> Self {
        Self {
            resolver,
            metrics,
            deadline,
        }
    }

    /// Resolves `query` under the configured deadline, recording counters
    /// for every outcome (spec.md §4.8).
    pub async fn handle(&self, query: LookupQuery) -> Outcome {
        self.metrics.record_received();
        let type_tag = query.record_type.to_string();
        let start = Instant::now();

        let result = tokio::time::timeout(self.deadline, self.resolver.resolve(&query)).await;
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(Ok(records)) => {
                self.metrics.record_answered(&type_tag, elapsed);
                Outcome::Answered(records)
            }
            Ok(Err(CoreError::NotFound)) => {
                self.metrics.record_not_found(&type_tag, elapsed);
                Outcome::NotFound
            }
            Ok(Err(e)) => {
                warn!(name = %query.name, record_type = %type_tag, error = %e, "resolve failed");
                self.metrics.record_error(&type_tag);
                Outcome::Error(e)
            }
            Err(_) => {
                error!(name = %query.name, record_type = %type_tag, "resolve deadline exceeded");
                self.metrics.record_error(&type_tag);
                Outcome::Error(CoreError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStats, LocalCache, TieredCache};
    use crate::config::SelectorPolicy;
    use crate::model::{RecordData, RecordType};
    use crate::selector::Selector;
    use crate::store::memory::MemoryStore;
    use crate::store::RecordStore;
    use crate::wildcard::WildcardEngine;

    fn test_orchestrator(deadline: Duration) -> (Orchestrator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let stats = Arc::new(CacheStats::default());
        let l1 = Arc::new(LocalCache::new(1000, stats.clone()));
        let cache: Arc<dyn RecordStore> = Arc::new(TieredCache::new(
            Some(l1),
            None,
            store.clone() as Arc<dyn RecordStore>,
            stats,
        ));
        let resolver = Arc::new(Resolver::new(
            cache,
            Arc::new(WildcardEngine::new()),
            Selector::new(SelectorPolicy::RoundRobin),
        ));
        let metrics = Arc::new(CoreMetrics::new().unwrap());
        (Orchestrator::new(resolver, metrics, deadline), store)
    }

    #[tokio::test]
    async fn answered_on_hit() {
        let (orchestrator, store) = test_orchestrator(Duration::from_secs(1));
        store
            .create(DnsRecord::new(
                1,
                "www.test.internal",
                RecordType::A,
                RecordData::A("10.0.0.1".parse().unwrap()),
                300,
                0,
            ))
            .await
            .unwrap();

        let query = LookupQuery::new("www.test.internal", RecordType::A);
        let outcome = orchestrator.handle(query).await;
        assert!(matches!(outcome, Outcome::Answered(records) if records.len() == 1));
    }

    #[tokio::test]
    async fn not_found_on_miss() {
        let (orchestrator, _store) = test_orchestrator(Duration::from_secs(1));
        let query = LookupQuery::new("ghost.test.internal", RecordType::A);
        assert!(matches!(orchestrator.handle(query).await, Outcome::NotFound));
    }

    #[tokio::test]
    async fn zero_deadline_surfaces_timeout() {
        let (orchestrator, _store) = test_orchestrator(Duration::from_nanos(1));
        let query = LookupQuery::new("www.test.internal", RecordType::A);
        let outcome = orchestrator.handle(query).await;
        assert!(matches!(
            outcome,
            Outcome::Error(CoreError::Timeout) | Outcome::NotFound
        ));
    }
}
