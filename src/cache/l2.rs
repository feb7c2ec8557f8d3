//! Shared distributed cache tier (spec.md §4.3, component B), grounded on
//! the teacher's `cache::redis_backend::RedisCache`. Serialization uses
//! `bincode` — a length-prefixed binary framing — over the `serde`-derived
//! `RecordGroup`, the option spec.md §4.3 calls "preferred for tight
//! latency" over JSON.

use crate::error::{CoreError, Result};
use crate::model::RecordGroup;
use async_trait::async_trait;
use futures::StreamExt;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Abstracts the distributed tier so the facade can run with L2 disabled
/// (spec.md §4.3: "L2 is optional: if disabled, D collapses to L1→L3").
#[async_trait]
pub trait L2Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<RecordGroup>>;
    async fn set(&self, key: &str, group: &RecordGroup, ttl: Duration) -> Result<()>;
    async fn delete(&self, keys: &[&str]) -> Result<()>;
    async fn scan(&self, prefix: &str) -> Result<Vec<String>>;
    async fn ping(&self) -> Result<()>;
}

/// Namespaces every key with a fixed prefix so DNS entries can coexist
/// with other tenants of the same Redis instance and be bulk-invalidated
/// via `scan` + `delete` (spec.md §4.3).
pub struct RedisCache {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    pub async fn connect(address: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(address)
            .map_err(|e| CoreError::Redis(format!("failed to create redis client: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CoreError::Redis(format!("failed to connect to redis: {e}")))?;
        info!(address, "connected to L2 redis cache");
        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl L2Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<RecordGroup>> {
        let mut conn = self.conn.clone();
        let raw: Option<Vec<u8>> = conn
            .get(self.namespaced(key))
            .await
            .map_err(|e| CoreError::Redis(format!("GET failed: {e}")))?;
        match raw {
            Some(bytes) => {
                let (group, _) = bincode::serde::decode_from_slice(
                    &bytes,
                    bincode::config::standard(),
                )
                .map_err(|e| CoreError::Cache(format!("L2 decode failed: {e}")))?;
                debug!(key, "L2 cache hit");
                Ok(Some(group))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, group: &RecordGroup, ttl: Duration) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(group, bincode::config::standard())
            .map_err(|e| CoreError::Cache(format!("L2 encode failed: {e}")))?;
        let mut conn = self.conn.clone();
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(self.namespaced(key), bytes, ttl_secs)
            .await
            .map_err(|e| CoreError::Redis(format!("SETEX failed: {e}")))?;
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let namespaced: Vec<String> = keys.iter().map(|k| self.namespaced(k)).collect();
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(namespaced)
            .await
            .map_err(|e| CoreError::Redis(format!("DEL failed: {e}")))?;
        Ok(())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.namespaced(prefix));
        let keys: Vec<String> = conn
            .scan_match(pattern)
            .await
            .map_err(|e| CoreError::Redis(format!("SCAN failed: {e}")))?
            .collect()
            .await;
        let stripped = keys
            .into_iter()
            .map(|k| k.trim_start_matches(&self.key_prefix).to_string())
            .collect();
        Ok(stripped)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!(error = %e, "L2 ping failed");
                CoreError::Redis(format!("PING failed: {e}"))
            })
    }
}
