//! The persistent record schema (spec.md §6), documented but not
//! implemented: schema migration tooling is explicitly out of scope
//! (spec.md §1). A production deployment implements `RecordStore` against
//! this shape, the way `zone::store::ZoneStore` in the teacher wraps a
//! concrete backend behind the same trait `memory::MemoryStore` satisfies
//! here.
//!
//! ```sql
//! CREATE TABLE records (
//!     id          BIGINT PRIMARY KEY,
//!     name        VARCHAR(253) NOT NULL,
//!     type        record_type NOT NULL,
//!     target      TEXT NOT NULL,
//!     ttl         INTEGER NOT NULL CHECK (ttl >= 0),
//!     priority    INTEGER NOT NULL CHECK (priority >= 0),
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     -- optional type-specific columns
//!     mbox        VARCHAR(253),
//!     serial      BIGINT,
//!     refresh     INTEGER,
//!     retry       INTEGER,
//!     expire      INTEGER,
//!     minttl      INTEGER,
//!     weight      INTEGER,
//!     port        INTEGER,
//!     tag         VARCHAR(63)
//! );
//! CREATE INDEX ON records (lower(name), type);
//! CREATE INDEX ON records (lower(name), type, priority);
//!
//! CREATE TABLE wildcard_patterns (
//!     id                  BIGINT PRIMARY KEY,
//!     etld                VARCHAR(253) NOT NULL,
//!     apex_domain         VARCHAR(253) NOT NULL,
//!     subdomain_labels    TEXT[] NOT NULL,
//!     wildcard_mask       BIT(64) NOT NULL,
//!     exact_match_count   INTEGER NOT NULL,
//!     payload_record_id   BIGINT NOT NULL REFERENCES records(id),
//!     created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE INDEX ON wildcard_patterns (etld, cardinality(subdomain_labels));
//! ```
