//! Shared validation sub-predicates for record values.
//!
//! spec.md treats per-record-type syntactic validation as an external, pure
//! predicate and leaves its structure unspecified, noting (§9, "Open
//! question — record-type validation") that the source this spec was
//! distilled from repeats similar normalization logic across per-type
//! validators, with domain-name validation duplicated verbatim. Resolution:
//! factor the repeated sub-predicates here (domain name, hex string,
//! integer range) so a type-specific predicate is a short composition of
//! these rather than its own copy.

/// RFC 1035 label/name limits, matching the teacher's
/// `validation::ValidationConfig` defaults.
pub const MAX_DOMAIN_LENGTH: usize = 255;
pub const MAX_LABEL_LENGTH: usize = 63;

/// A syntactically valid DNS name: non-empty labels, each within the
/// length limit, total length within the domain limit, ASCII only.
pub fn is_valid_domain_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    if !name.is_ascii() {
        return false;
    }
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        // the root, "."
        return name == ".";
    }
    trimmed.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        return false;
    }
    let bytes = label.as_bytes();
    let alnum_or_hyphen = |b: u8| b.is_ascii_alphanumeric() || b == b'-';
    bytes.iter().all(|&b| alnum_or_hyphen(b)) && bytes[0] != b'-' && bytes[bytes.len() - 1] != b'-'
}

/// A label may contain exactly one wildcard marker, `*`, and nothing else.
pub fn is_exact_label_or_full_wildcard(label: &str) -> bool {
    label == "*" || is_valid_label(label)
}

/// Rejects partial-label wildcards (`foo*`, `*bar`) at pattern ingestion,
/// per spec.md §4.6's edge cases.
pub fn is_valid_wildcard_label(label: &str) -> bool {
    is_exact_label_or_full_wildcard(label)
}

/// A string of an even number of hex digits, used by TLSA's `cert_data`.
pub fn is_hex_string(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if !is_hex_string(s) {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

/// Inclusive integer range check, used for TTL, priority, and the small
/// enumerated fields (CAA flag, TLSA usage/selector/matching_type).
pub fn in_range_u32(value: u32, min: u32, max: u32) -> bool {
    value >= min && value <= max
}

pub fn in_range_u8(value: u8, min: u8, max: u8) -> bool {
    value >= min && value <= max
}

/// TTL bound, matching the teacher's `ValidationConfig::max_ttl` default
/// (one week) interpreted as seconds; spec.md only requires non-negative
/// 32-bit TTLs, so this is an additional sanity bound, not a hard floor.
pub const MAX_SANE_TTL: u32 = 86_400 * 7;

pub fn is_sane_ttl(ttl: u32) -> bool {
    in_range_u32(ttl, 0, MAX_SANE_TTL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(is_valid_domain_name("example.com"));
        assert!(is_valid_domain_name("api.v1.test.internal."));
        assert!(is_valid_domain_name("."));
    }

    #[test]
    fn rejects_empty_labels_and_overlong_labels() {
        assert!(!is_valid_domain_name("..com"));
        assert!(!is_valid_domain_name(""));
        let long_label = "a".repeat(64);
        assert!(!is_valid_domain_name(&format!("{long_label}.com")));
    }

    #[test]
    fn wildcard_label_rules() {
        assert!(is_valid_wildcard_label("*"));
        assert!(is_valid_wildcard_label("service"));
        assert!(!is_valid_wildcard_label("foo*"));
        assert!(!is_valid_wildcard_label("*bar"));
    }

    #[test]
    fn hex_string_rules() {
        assert!(is_hex_string("deadbeef"));
        assert!(!is_hex_string("deadbee"));
        assert!(!is_hex_string("zz"));
        assert_eq!(decode_hex("00ff"), Some(vec![0x00, 0xff]));
    }
}
