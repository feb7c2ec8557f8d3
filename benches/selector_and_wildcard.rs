//! Hot-path benchmarks for the selector (spec.md §4.5) and wildcard engine
//! (spec.md §4.6), the two components the size budget weights heaviest.

use apexdns::config::SelectorPolicy;
use apexdns::model::{DnsRecord, RecordData, RecordGroup, RecordType};
use apexdns::selector::Selector;
use apexdns::wildcard::{WildcardEngine, WildcardPattern};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::net::Ipv4Addr;

fn priority_group(n: u64) -> RecordGroup {
    let records = (0..n)
        .map(|i| {
            DnsRecord::new(
                i,
                "priority-test.internal",
                RecordType::A,
                RecordData::A(Ipv4Addr::new(10, 0, 2, 20 + i as u8)),
                300,
                10,
            )
        })
        .collect();
    RecordGroup::from_records(records).unwrap()
}

fn bench_selector(c: &mut Criterion) {
    let selector = Selector::new(SelectorPolicy::RoundRobin);
    let group = priority_group(8);

    c.bench_function("selector_round_robin_select", |b| {
        b.iter(|| selector.select(black_box(&group), "priority-test.internal", "A"))
    });
}

fn bench_wildcard_engine(c: &mut Criterion) {
    let engine = WildcardEngine::new();
    for i in 0..1000u64 {
        let labels = vec![format!("host{i}"), "service".to_string(), "prod".to_string()];
        let pattern = WildcardPattern::new(i, "example.com", labels, i, Utc::now()).unwrap();
        engine.insert(pattern);
    }
    // A handful of wildcard candidates competing on the same query shape.
    engine.insert(
        WildcardPattern::new(
            2000,
            "example.com",
            vec!["*".to_string(), "service".to_string(), "prod".to_string()],
            2000,
            Utc::now(),
        )
        .unwrap(),
    );

    c.bench_function("wildcard_engine_resolve", |b| {
        b.iter(|| engine.resolve(black_box("host500.service.prod.example.com")))
    });
}

criterion_group!(benches, bench_selector, bench_wildcard_engine);
criterion_main!(benches);
