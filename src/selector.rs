//! Priority/tie-break selector (spec.md §4.5, component E): deterministically
//! reduces a `RecordGroup` to one record for single-answer query types.
//! Grounded on the teacher's `resolver.rs` round-robin answer rotation, but
//! rebuilt around a stateless mixer instead of per-process rotation state so
//! that determinism holds across threads without locking (spec.md §9).

use crate::config::SelectorPolicy;
use crate::model::{DnsRecord, RecordGroup};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds per round-robin rotation bucket.
const ROUND_ROBIN_BUCKET_SECS: u64 = 5;
/// Seconds per random-policy rotation bucket.
const RANDOM_BUCKET_SECS: u64 = 300;

pub struct Selector {
    policy: SelectorPolicy,
}

impl Selector {
    pub fn new(policy: SelectorPolicy) -> Self {
        Self { policy }
    }

    /// Picks one record from `group`. A group of size 1 always returns that
    /// record regardless of policy (spec.md §8).
    pub fn select<'a>(&self, group: &'a RecordGroup, name: &str, record_type_tag: &str) -> Option<&'a DnsRecord> {
        let n = group.records.len();
        if n == 0 {
            return None;
        }
        if n == 1 {
            return group.records.first();
        }

        let now = epoch_secs();
        let index = match self.policy {
            SelectorPolicy::RoundRobin => {
                let bucket = now / ROUND_ROBIN_BUCKET_SECS;
                let h = stable_hash(name, record_type_tag);
                (h.wrapping_add(bucket) as usize) % n
            }
            SelectorPolicy::Random => {
                let bucket = now / RANDOM_BUCKET_SECS;
                let seed = stable_hash_with_bucket(name, record_type_tag, bucket);
                mix64(seed) as usize % n
            }
        };

        group.records.get(index)
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A stable 64-bit hash over `(name, type)`, used as `H` in spec.md §4.5.
fn stable_hash(name: &str, record_type_tag: &str) -> u64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    record_type_tag.hash(&mut hasher);
    hasher.finish()
}

fn stable_hash_with_bucket(name: &str, record_type_tag: &str, bucket: u64) -> u64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    record_type_tag.hash(&mut hasher);
    bucket.hash(&mut hasher);
    hasher.finish()
}

/// A 64-bit non-cryptographic mixer (splitmix64), used to turn the `random`
/// policy's seed into a PRNG-like index without holding per-process state
/// (spec.md §9).
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordData, RecordType};
    use std::net::Ipv4Addr;

    fn group_of(n: u64) -> RecordGroup {
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

    #[test]
    fn single_record_group_always_returned() {
        let selector = Selector::new(SelectorPolicy::RoundRobin);
        let group = group_of(1);
        let picked = selector.select(&group, "www.test.internal", "A").unwrap();
        assert_eq!(picked.id, 0);
    }

    #[test]
    fn same_bucket_same_query_is_deterministic() {
        let selector = Selector::new(SelectorPolicy::RoundRobin);
        let group = group_of(3);
        let a = selector.select(&group, "priority-test.internal", "A").unwrap();
        let b = selector.select(&group, "priority-test.internal", "A").unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn round_robin_only_picks_within_group() {
        let selector = Selector::new(SelectorPolicy::RoundRobin);
        let group = group_of(3);
        let picked = selector.select(&group, "priority-test.internal", "A").unwrap();
        assert!(group.records.iter().any(|r| r.id == picked.id));
    }

    #[test]
    fn random_policy_also_respects_single_record() {
        let selector = Selector::new(SelectorPolicy::Random);
        let group = group_of(1);
        assert_eq!(selector.select(&group, "x", "A").unwrap().id, 0);
    }
}
