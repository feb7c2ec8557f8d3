//! Positional-wildcard matching engine (spec.md §4.6, component F).
//! Candidates are indexed by `(etld, label_count)` the way the teacher
//! indexes zone records by `(name, type)` in `zone::store::ZoneStore`;
//! matching itself has no direct teacher analogue and follows spec.md's
//! bitmask algorithm directly.

use super::psl;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A stored positional-wildcard pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardPattern {
    pub id: u64,
    pub etld: String,
    pub apex_domain: String,
    /// Left-to-right ordered, most-significant label (closest to the apex)
    /// first, matching `psl::split`'s `subdomain_labels` ordering.
    pub subdomain_labels: Vec<String>,
    /// Bit *i* set ⇔ `subdomain_labels[i] == "*"`.
    pub wildcard_mask: u64,
    pub exact_match_count: u32,
    pub payload_record_id: u64,
    pub created_at: DateTime<Utc>,
}

impl WildcardPattern {
    /// Builds a pattern from raw labels, validating and computing derived
    /// fields. Rejects partial-label wildcards (`foo*`, `*bar`) per
    /// spec.md §4.6 edge cases.
    pub fn new(
        id: u64,
        apex_domain: &str,
        subdomain_labels: Vec<String>,
        payload_record_id: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if subdomain_labels.len() > 64 {
            return Err(CoreError::Malformed(
                "wildcard pattern exceeds 64 subdomain labels".to_string(),
            ));
        }
        let split = psl::split(apex_domain).ok_or_else(|| {
            CoreError::Malformed(format!("apex domain has no registrable eTLD: {apex_domain}"))
        })?;
        if !split.subdomain_labels.is_empty() {
            return Err(CoreError::Malformed(format!(
                "{apex_domain} is not an apex domain"
            )));
        }

        let mut wildcard_mask: u64 = 0;
        for (i, label) in subdomain_labels.iter().enumerate() {
            if label == "*" {
                wildcard_mask |= 1 << i;
            } else if label.contains('*') {
                return Err(CoreError::Malformed(format!(
                    "partial-label wildcard rejected: {label}"
                )));
            }
        }

        let valid_positions_mask = if subdomain_labels.is_empty() {
            0
        } else {
            (1u64 << subdomain_labels.len()) - 1
        };
        let exact_match_count = (!wildcard_mask & valid_positions_mask).count_ones();

        Ok(Self {
            id,
            etld: split.etld,
            apex_domain: split.apex_domain,
            subdomain_labels,
            wildcard_mask,
            exact_match_count,
            payload_record_id,
            created_at,
        })
    }

    /// Whether this pattern is identical in matching terms to `other`
    /// (same etld, labels, mask) — spec.md §4.6's duplicate definition.
    fn is_duplicate_of(&self, other: &WildcardPattern) -> bool {
        self.etld == other.etld
            && self.subdomain_labels == other.subdomain_labels
            && self.wildcard_mask == other.wildcard_mask
    }
}

#[derive(Default)]
struct PatternIndex {
    /// Keyed by `(etld, label_count)` per spec.md §4.6 step 2's required
    /// index.
    by_etld_and_len: HashMap<(String, usize), Vec<WildcardPattern>>,
}

pub struct WildcardEngine {
    index: RwLock<PatternIndex>,
}

impl WildcardEngine {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(PatternIndex::default()),
        }
    }

    /// Inserts a pattern, rejecting an exact duplicate (spec.md §4.6: "one
    /// retained" — the existing entry wins and the insert is a no-op).
    pub fn insert(&self, pattern: WildcardPattern) {
        let key = (pattern.etld.clone(), pattern.subdomain_labels.len());
        let mut index = self.index.write();
        let bucket = index.by_etld_and_len.entry(key).or_default();
        if bucket.iter().any(|p| p.is_duplicate_of(&pattern)) {
            return;
        }
        bucket.push(pattern);
    }

    pub fn remove(&self, id: u64) {
        let mut index = self.index.write();
        for bucket in index.by_etld_and_len.values_mut() {
            bucket.retain(|p| p.id != id);
        }
    }

    /// Resolves `name` to the winning pattern's payload record id, if any,
    /// per spec.md §4.6's candidate filter and precedence rules.
    pub fn resolve(&self, name: &str) -> Option<u64> {
        let split = psl::split(name)?;
        let q_labels = &split.subdomain_labels;
        let key = (split.etld.clone(), q_labels.len());

        let index = self.index.read();
        let bucket = index.by_etld_and_len.get(&key)?;

        let matches: Vec<&WildcardPattern> = bucket
            .iter()
            .filter(|p| matches_labels(p, q_labels))
            .collect();

        winner(&matches).map(|p| p.payload_record_id)
    }
}

impl Default for WildcardEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// spec.md §4.6 step 3: accept iff every position is either wildcarded or
/// an exact case-insensitive label match.
fn matches_labels(pattern: &WildcardPattern, q_labels: &[String]) -> bool {
    if pattern.subdomain_labels.len() != q_labels.len() {
        return false;
    }
    pattern
        .subdomain_labels
        .iter()
        .zip(q_labels.iter())
        .enumerate()
        .all(|(i, (label, q_label))| {
            let is_wildcard = (pattern.wildcard_mask >> i) & 1 == 1;
            is_wildcard || label.eq_ignore_ascii_case(q_label)
        })
}

/// Picks the winner among candidates already known to match the same
/// query, applying Tiers 1-4 of spec.md §4.6.
fn winner<'a>(matches: &[&'a WildcardPattern]) -> Option<&'a WildcardPattern> {
    if matches.is_empty() {
        return None;
    }
    if matches.len() == 1 {
        return Some(matches[0]);
    }

    // Tier 1: a fully-exact candidate (mask == 0) wins outright.
    if let Some(exact) = matches.iter().copied().find(|p| p.wildcard_mask == 0) {
        return Some(exact);
    }

    // Tier 2: highest exact_match_count wins.
    let max_exact_count = matches.iter().map(|p| p.exact_match_count).max()?;
    let tier2: Vec<&'a WildcardPattern> = matches
        .iter()
        .copied()
        .filter(|p| p.exact_match_count == max_exact_count)
        .collect();
    if tier2.len() == 1 {
        return Some(tier2[0]);
    }

    // Tier 3: leftmost position where one candidate is exact and the
    // other wildcard wins for the exact side. Equivalent to the numerically
    // smaller mask when position 0 is treated as the most-significant bit
    // of the comparison.
    let best_mask = tier2
        .iter()
        .map(|p| reversed_mask(p.wildcard_mask, p.subdomain_labels.len()))
        .min()?;
    let tier3: Vec<&'a WildcardPattern> = tier2
        .iter()
        .copied()
        .filter(|p| reversed_mask(p.wildcard_mask, p.subdomain_labels.len()) == best_mask)
        .collect();
    if tier3.len() == 1 {
        return Some(tier3[0]);
    }

    // Tier 4: deterministic safety-net tiebreaker (spec.md §4.6: cannot
    // occur by construction, retained defensively).
    tier3.into_iter().min_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.subdomain_labels.cmp(&b.subdomain_labels))
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Reinterprets `mask`'s low `len` bits with position 0 as the
/// most-significant bit, so plain numeric comparison implements Tier 3's
/// left-to-right, most-specific-wins rule.
fn reversed_mask(mask: u64, len: usize) -> u64 {
    let mut reversed = 0u64;
    for i in 0..len {
        if (mask >> i) & 1 == 1 {
            reversed |= 1 << (len - 1 - i);
        }
    }
    reversed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(id: u64, labels: &[&str], payload: u64) -> WildcardPattern {
        WildcardPattern::new(
            id,
            "example.com",
            labels.iter().map(|s| s.to_string()).collect(),
            payload,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn wildcard_precedence_scenario() {
        // spec.md §8 scenario 4: P1 `*.service.prod` vs P2 `api.*.prod`
        // under query `api.service.prod.example.com` → P2 wins.
        let engine = WildcardEngine::new();
        engine.insert(pattern(1, &["*", "service", "prod"], 100));
        engine.insert(pattern(2, &["api", "*", "prod"], 200));

        let winner = engine.resolve("api.service.prod.example.com");
        assert_eq!(winner, Some(200));
    }

    #[test]
    fn exact_match_beats_any_wildcard() {
        let engine = WildcardEngine::new();
        engine.insert(pattern(1, &["api", "service", "prod"], 100));
        engine.insert(pattern(2, &["*", "service", "prod"], 200));

        let winner = engine.resolve("api.service.prod.example.com");
        assert_eq!(winner, Some(100));
    }

    #[test]
    fn no_candidate_returns_none() {
        let engine = WildcardEngine::new();
        engine.insert(pattern(1, &["api"], 100));
        assert_eq!(engine.resolve("other.example.com"), None);
    }

    #[test]
    fn apex_query_only_matches_zero_label_pattern() {
        let engine = WildcardEngine::new();
        let zero_label = WildcardPattern::new(1, "example.com", vec![], 999, Utc::now()).unwrap();
        engine.insert(zero_label);
        engine.insert(pattern(2, &["*"], 100));

        assert_eq!(engine.resolve("example.com"), Some(999));
    }

    #[test]
    fn partial_label_wildcard_rejected() {
        let result = WildcardPattern::new(
            1,
            "example.com",
            vec!["foo*".to_string()],
            1,
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_pattern_keeps_first() {
        let engine = WildcardEngine::new();
        engine.insert(pattern(1, &["api"], 100));
        engine.insert(pattern(2, &["api"], 200));
        assert_eq!(engine.resolve("api.example.com"), Some(100));
    }
}
