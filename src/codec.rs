//! The wire-level DNS codec boundary (spec.md §1, §6): out of scope for
//! implementation here. The core consumes `(name, type)` tuples and
//! returns resource records; a concrete UDP/TCP transport (the teacher's
//! `protocol::udp`/`protocol::tcp`) implements this trait to bridge wire
//! bytes to `LookupQuery`/`DnsRecord` and back.

use crate::error::Result;
use crate::model::{DnsRecord, LookupQuery};

/// A parsed question plus whatever wire-level context (transaction id,
/// requested flags) the codec needs to carry through to `encode`.
pub trait Codec: Send + Sync {
    type Context;

    /// Parses raw wire bytes into a lookup query and opaque context.
    fn decode(&self, bytes: &[u8]) -> Result<(LookupQuery, Self::Context)>;

    /// Serializes an answer set (or an empty slice for *NotFound*) plus the
    /// original context back into wire bytes.
    fn encode(&self, context: Self::Context, records: &[DnsRecord]) -> Result<Vec<u8>>;
}
