//! Core data model: records, queries, and record groups.
//!
//! `RecordType`/`RecordData` are trimmed from the teacher's much larger
//! `dns::enums::DNSResourceType`/`dns::resource_record::RData` to the
//! closed set this spec names; DNSSEC and zone-transfer types are non-goals.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Ns,
    Soa,
    Ptr,
    Srv,
    Caa,
    Tlsa,
    Other(u16),
}

impl RecordType {
    /// Types for which multiple answers are returned ordered, rather than
    /// reduced to one via the selector.
    pub fn is_multi_answer(self) -> bool {
        matches!(self, RecordType::Mx | RecordType::Ns | RecordType::Srv)
    }

    /// Types eligible for wildcard fallback when the exact lookup misses.
    pub fn supports_wildcard(self) -> bool {
        matches!(
            self,
            RecordType::A | RecordType::Aaaa | RecordType::Cname | RecordType::Txt
        )
    }

    /// The "common" types invalidated by a name-only delete
    /// (spec.md §4.1, §4.4).
    pub const COMMON: &'static [RecordType] = &[
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Txt,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Soa,
        RecordType::Ptr,
        RecordType::Srv,
        RecordType::Caa,
        RecordType::Tlsa,
    ];
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Mx => write!(f, "MX"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Soa => write!(f, "SOA"),
            RecordType::Ptr => write!(f, "PTR"),
            RecordType::Srv => write!(f, "SRV"),
            RecordType::Caa => write!(f, "CAA"),
            RecordType::Tlsa => write!(f, "TLSA"),
            RecordType::Other(code) => write!(f, "TYPE{code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(String),
    Txt(Vec<String>),
    Mx { preference: u16, exchange: String },
    Ns(String),
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Ptr(String),
    Srv {
        weight: u16,
        port: u16,
        target: String,
    },
    Caa { flag: u8, tag: String, value: String },
    Tlsa {
        usage: u8,
        selector: u8,
        matching_type: u8,
        cert_data: Vec<u8>,
    },
    Other(Vec<u8>),
}

/// The atomic unit stored by the record store.
///
/// `priority`: lower is more preferred (MX convention, applied uniformly
/// per spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: u64,
    pub name: String,
    pub record_type: RecordType,
    pub data: RecordData,
    pub ttl: u32,
    pub priority: u32,
}

impl DnsRecord {
    /// Normalizes a name the way the store does on write: lowercased,
    /// trailing dot stripped. Idempotent.
    pub fn normalize_name(name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        lower.strip_suffix('.').unwrap_or(&lower).to_string()
    }

    pub fn new(
        id: u64,
        name: &str,
        record_type: RecordType,
        data: RecordData,
        ttl: u32,
        priority: u32,
    ) -> Self {
        Self {
            id,
            name: Self::normalize_name(name),
            record_type,
            data,
            ttl,
            priority,
        }
    }
}

/// `(normalized_name, type)` — the unit a resolve is performed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupQuery {
    pub name: String,
    pub record_type: RecordType,
}

impl LookupQuery {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            name: DnsRecord::normalize_name(name),
            record_type,
        }
    }

    /// The cache key format from spec.md §6: `"{name}:{type}"`.
    pub fn fingerprint(&self) -> String {
        format!("{}:{}", self.name, self.record_type)
    }
}

/// The non-empty set of records sharing the minimum priority for a query.
/// Ordered by ascending id within the group (spec.md §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordGroup {
    pub records: Vec<DnsRecord>,
}

impl RecordGroup {
    /// Reduces an unordered set of same-(name,type) records to the group
    /// sharing the minimum priority, sorted by ascending id.
    pub fn from_records(mut records: Vec<DnsRecord>) -> Option<Self> {
        let min_priority = records.iter().map(|r| r.priority).min()?;
        records.retain(|r| r.priority == min_priority);
        records.sort_by_key(|r| r.id);
        Some(Self { records })
    }

    /// The semantic TTL for the group, used to derive tier TTLs
    /// (spec.md §4.4): `records[0].ttl` once sorted by id.
    pub fn ttl(&self) -> u32 {
        self.records.first().map(|r| r.ttl).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
