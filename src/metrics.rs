//! Prometheus metrics registry (spec.md §6: "periodic statistics emission
//! (counters + rates)"), trimmed from the teacher's `metrics::DnsMetrics`
//! (cache/query/upstream/rate-limit/blocking families) down to the
//! counters this crate's query path actually produces: cache hit/miss/
//! eviction gauges and the orchestrator's received/answered/not-found/
//! error/per-type counters (spec.md §4.8).

use prometheus::{
    histogram_opts, opts, CounterVec, Encoder, Gauge, HistogramVec, IntGauge, Registry, TextEncoder,
};

pub struct CoreMetrics {
    registry: Registry,

    // Cache counters are gauges, not prometheus `Counter`s: they're synced
    // periodically from `CacheStats`'s atomics, which are the source of
    // truth and already monotonic; a gauge lets us set the absolute value.
    cache_hits: IntGauge,
    cache_misses: IntGauge,
    cache_evictions: IntGauge,
    cache_hit_rate: Gauge,

    queries_received: prometheus::IntCounter,
    queries_answered: prometheus::IntCounter,
    queries_not_found: prometheus::IntCounter,
    queries_error: prometheus::IntCounter,
    queries_by_type: CounterVec,
    query_duration: HistogramVec,
}

impl CoreMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cache_hits = IntGauge::with_opts(opts!(
            "apexdns_cache_hits_total",
            "Total number of cache hits across L1 and L2"
        ))?;
        let cache_misses = IntGauge::with_opts(opts!(
            "apexdns_cache_misses_total",
            "Total number of cache misses falling through to the store"
        ))?;
        let cache_evictions = IntGauge::with_opts(opts!(
            "apexdns_cache_evictions_total",
            "Total number of L1 LRU evictions"
        ))?;
        let cache_hit_rate = Gauge::with_opts(opts!(
            "apexdns_cache_hit_rate",
            "Cache hit rate in [0, 1]"
        ))?;

        let queries_received = prometheus::IntCounter::with_opts(opts!(
            "apexdns_queries_received_total",
            "Total number of queries accepted by the orchestrator"
        ))?;
        let queries_answered = prometheus::IntCounter::with_opts(opts!(
            "apexdns_queries_answered_total",
            "Total number of queries answered"
        ))?;
        let queries_not_found = prometheus::IntCounter::with_opts(opts!(
            "apexdns_queries_not_found_total",
            "Total number of queries resolved as not-found"
        ))?;
        let queries_error = prometheus::IntCounter::with_opts(opts!(
            "apexdns_queries_error_total",
            "Total number of queries that failed with an error"
        ))?;
        let queries_by_type = CounterVec::new(
            opts!(
                "apexdns_queries_by_type_total",
                "Total number of queries processed, by record type"
            ),
            &["record_type"],
        )?;
        let query_duration = HistogramVec::new(
            histogram_opts!(
                "apexdns_query_duration_seconds",
                "Query resolution duration in seconds"
            ),
            &["record_type"],
        )?;

        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(cache_evictions.clone()))?;
        registry.register(Box::new(cache_hit_rate.clone()))?;
        registry.register(Box::new(queries_received.clone()))?;
        registry.register(Box::new(queries_answered.clone()))?;
        registry.register(Box::new(queries_not_found.clone()))?;
        registry.register(Box::new(queries_error.clone()))?;
        registry.register(Box::new(queries_by_type.clone()))?;
        registry.register(Box::new(query_duration.clone()))?;

        Ok(Self {
            registry,
            cache_hits,
            cache_misses,
            cache_evictions,
            cache_hit_rate,
            queries_received,
            queries_answered,
            queries_not_found,
            queries_error,
            queries_by_type,
            query_duration,
        })
    }

    /// Pulls the live snapshot from `CacheStats` into the Prometheus
    /// gauges/counters. Called periodically rather than on every cache op,
    /// since the counters already track their own totals atomically.
    pub fn sync_cache_stats(&self, snapshot: crate::cache::CacheStatsSnapshot) {
        self.cache_hits.set(snapshot.hits as i64);
        self.cache_misses.set(snapshot.misses as i64);
        self.cache_evictions.set(snapshot.evictions as i64);
        self.cache_hit_rate.set(snapshot.hit_rate);
    }

    pub fn record_received(&self) {
        self.queries_received.inc();
    }

    pub fn record_answered(&self, record_type: &str, duration_secs: f64) {
        self.queries_answered.inc();
        self.queries_by_type.with_label_values(&[record_type]).inc();
        self.query_duration
            .with_label_values(&[record_type])
            .observe(duration_secs);
    }

    pub fn record_not_found(&self, record_type: &str, duration_secs: f64) {
        self.queries_not_found.inc();
        self.queries_by_type.with_label_values(&[record_type]).inc();
        self.query_duration
            .with_label_values(&[record_type])
            .observe(duration_secs);
    }

    pub fn record_error(&self, record_type: &str) {
        self.queries_error.inc();
        self.queries_by_type.with_label_values(&[record_type]).inc();
    }

    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_includes_registered_families() {
        let metrics = CoreMetrics::new().unwrap();
        metrics.record_received();
        metrics.record_answered("A", 0.01);
        let text = metrics.export().unwrap();
        assert!(text.contains("apexdns_queries_received_total"));
        assert!(text.contains("apexdns_queries_by_type_total"));
    }
}
