//! Public suffix determination, simplified from the teacher's
//! `blocking::psl::PublicSuffixList` (a compressed trie over the full
//! downloaded Mozilla PSL, built for domain-blocklist matching) to a small
//! static set: the wildcard engine only ever needs to split a query name
//! into `(etld, apex, subdomain_labels)`, not classify arbitrary blocklist
//! entries against tens of thousands of rules. Noted as a deliberate
//! simplification in DESIGN.md.

/// Multi-label effective TLDs recognized ahead of the generic single-label
/// fallback. Mirrors the common entries the teacher's
/// `simple_registrable_domain` fallback hardcodes.
const MULTI_LABEL_ETLDS: &[&str] = &[
    "co.uk", "co.jp", "co.kr", "co.za", "co.nz", "co.in", "co.il",
    "com.au", "com.br", "com.cn", "com.mx", "com.tw", "com.ar",
    "net.au", "net.br", "net.cn", "net.il",
    "org.uk", "org.au", "org.br", "org.cn", "org.il",
    "ac.uk", "gov.uk", "gov.au", "gov.cn", "gov.il",
    "edu.au", "edu.cn", "edu.mx", "github.io",
];

/// `(etld, apex_domain, subdomain_labels)` for a normalized query name,
/// per spec.md §4.6 step 1. `subdomain_labels` is left-to-right ordered
/// (most-significant label first).
pub struct SplitName {
    pub etld: String,
    pub apex_domain: String,
    pub subdomain_labels: Vec<String>,
}

/// Splits `name` (already normalized: lowercased, no trailing dot) into its
/// eTLD, apex domain, and subdomain labels.
///
/// Returns `None` if `name` has fewer labels than its matched eTLD, i.e. the
/// name doesn't even reach its own eTLD+1 boundary (e.g. bare `"com"`).
pub fn split(name: &str) -> Option<SplitName> {
    if name.is_empty() {
        return None;
    }
    let labels: Vec<&str> = name.split('.').collect();

    let etld_len = longest_matching_etld_labels(&labels);
    // apex needs the eTLD plus exactly one more label.
    if labels.len() < etld_len + 1 {
        return None;
    }

    let etld = labels[labels.len() - etld_len..].join(".");
    let apex_domain = labels[labels.len() - etld_len - 1..].join(".");
    let subdomain_labels = labels[..labels.len() - etld_len - 1]
        .iter()
        .map(|s| s.to_string())
        .collect();

    Some(SplitName {
        etld,
        apex_domain,
        subdomain_labels,
    })
}

/// Number of trailing labels belonging to the longest matching eTLD, in
/// `MULTI_LABEL_ETLDS` or else the single trailing label (the generic
/// single-label-TLD fallback, e.g. `.com`, `.net`).
fn longest_matching_etld_labels(labels: &[&str]) -> usize {
    if labels.len() >= 2 {
        let candidate = format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
        if MULTI_LABEL_ETLDS.contains(&candidate.as_str()) {
            return 2;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tld_splits_into_one_label_etld() {
        let split = split("api.service.prod.example.com").unwrap();
        assert_eq!(split.etld, "com");
        assert_eq!(split.apex_domain, "example.com");
        assert_eq!(split.subdomain_labels, vec!["api", "service", "prod"]);
    }

    #[test]
    fn multi_label_etld_recognized() {
        let split = split("www.example.co.uk").unwrap();
        assert_eq!(split.etld, "co.uk");
        assert_eq!(split.apex_domain, "example.co.uk");
        assert_eq!(split.subdomain_labels, vec!["www"]);
    }

    #[test]
    fn apex_itself_has_empty_subdomain_labels() {
        let split = split("example.com").unwrap();
        assert_eq!(split.apex_domain, "example.com");
        assert!(split.subdomain_labels.is_empty());
    }

    #[test]
    fn bare_etld_has_no_apex() {
        assert!(split("com").is_none());
    }
}
