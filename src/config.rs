//! Process configuration. Recognized options mirror spec.md §6's table;
//! every field is overridable via an `APEXDNS_*` environment variable,
//! following the teacher's `HEIMDALL_*` env-override pattern in
//! `config.rs::DnsConfig::from_env`.

use crate::error::CoreError;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPolicy {
    RoundRobin,
    Random,
}

impl SelectorPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "round_robin" => Some(Self::RoundRobin),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct L1Config {
    pub enabled: bool,
    pub max_entries: usize,
    pub cleanup_interval: Duration,
}

impl Default for L1Config {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
            cleanup_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct L2Config {
    pub enabled: bool,
    pub address: String,
    pub pool_size: usize,
    pub dial_timeout: Duration,
}

impl Default for L2Config {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "redis://127.0.0.1:6379".to_string(),
            pool_size: 8,
            dial_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub db: String,
    pub user: String,
    pub pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            db: "dns".to_string(),
            user: "dns".to_string(),
            pool_size: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dns_port: u16,
    pub udp_timeout: Duration,
    pub tcp_timeout: Duration,
    pub max_concurrent: usize,
    pub l1: L1Config,
    pub l2: L2Config,
    pub store: StoreConfig,
    pub selector_policy: SelectorPolicy,
    pub shutdown_timeout: Duration,
    /// HTTP bind address for the `/healthz` and `/metrics` surface
    /// (teacher's `http_bind_addr`); `None` disables it.
    pub http_bind_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dns_port: 53,
            udp_timeout: Duration::from_secs(5),
            tcp_timeout: Duration::from_secs(5),
            max_concurrent: 10_000,
            l1: L1Config::default(),
            l2: L2Config::default(),
            store: StoreConfig::default(),
            selector_policy: SelectorPolicy::RoundRobin,
            shutdown_timeout: Duration::from_secs(10),
            http_bind_addr: Some(
                "127.0.0.1:8080"
                    .parse()
                    .expect("default HTTP bind address is valid"),
            ),
        }
    }
}

impl Config {
    /// Builds a config from defaults, then applies `APEXDNS_*` environment
    /// overrides. Returns a `Fatal`-flavored error on an invalid override,
    /// matching spec.md §7: a broken configuration invariant at startup is
    /// unrecoverable.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("APEXDNS_DNS_PORT") {
            config.dns_port = v
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid APEXDNS_DNS_PORT: {v}")))?;
        }

        if let Ok(v) = std::env::var("APEXDNS_UDP_TIMEOUT_SECS") {
            config.udp_timeout = Duration::from_secs(v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_UDP_TIMEOUT_SECS: {v}"))
            })?);
        }

        if let Ok(v) = std::env::var("APEXDNS_TCP_TIMEOUT_SECS") {
            config.tcp_timeout = Duration::from_secs(v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_TCP_TIMEOUT_SECS: {v}"))
            })?);
        }

        if let Ok(v) = std::env::var("APEXDNS_MAX_CONCURRENT") {
            config.max_concurrent = v
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid APEXDNS_MAX_CONCURRENT: {v}")))?;
        }

        if let Ok(v) = std::env::var("APEXDNS_L1_ENABLED") {
            config.l1.enabled = parse_bool(&v, true);
        }
        if let Ok(v) = std::env::var("APEXDNS_L1_MAX_ENTRIES") {
            config.l1.max_entries = v
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid APEXDNS_L1_MAX_ENTRIES: {v}")))?;
        }
        if let Ok(v) = std::env::var("APEXDNS_L1_CLEANUP_INTERVAL_SECS") {
            config.l1.cleanup_interval = Duration::from_secs(v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_L1_CLEANUP_INTERVAL_SECS: {v}"))
            })?);
        }

        if let Ok(v) = std::env::var("APEXDNS_L2_ENABLED") {
            config.l2.enabled = parse_bool(&v, false);
        }
        if let Ok(v) = std::env::var("APEXDNS_L2_ADDRESS") {
            config.l2.address = v;
        }
        if let Ok(v) = std::env::var("APEXDNS_L2_POOL_SIZE") {
            config.l2.pool_size = v
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid APEXDNS_L2_POOL_SIZE: {v}")))?;
        }
        if let Ok(v) = std::env::var("APEXDNS_L2_DIAL_TIMEOUT_SECS") {
            config.l2.dial_timeout = Duration::from_secs(v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_L2_DIAL_TIMEOUT_SECS: {v}"))
            })?);
        }

        if let Ok(v) = std::env::var("APEXDNS_STORE_HOST") {
            config.store.host = v;
        }
        if let Ok(v) = std::env::var("APEXDNS_STORE_PORT") {
            config.store.port = v
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid APEXDNS_STORE_PORT: {v}")))?;
        }
        if let Ok(v) = std::env::var("APEXDNS_STORE_DB") {
            config.store.db = v;
        }
        if let Ok(v) = std::env::var("APEXDNS_STORE_USER") {
            config.store.user = v;
        }
        if let Ok(v) = std::env::var("APEXDNS_STORE_POOL_SIZE") {
            config.store.pool_size = v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_STORE_POOL_SIZE: {v}"))
            })?;
        }

        if let Ok(v) = std::env::var("APEXDNS_SELECTOR_POLICY") {
            config.selector_policy = SelectorPolicy::parse(&v).ok_or_else(|| {
                CoreError::Config(format!(
                    "invalid APEXDNS_SELECTOR_POLICY: {v} (expected round_robin or random)"
                ))
            })?;
        }

        if let Ok(v) = std::env::var("APEXDNS_SHUTDOWN_TIMEOUT_SECS") {
            config.shutdown_timeout = Duration::from_secs(v.parse().map_err(|_| {
                CoreError::Config(format!("invalid APEXDNS_SHUTDOWN_TIMEOUT_SECS: {v}"))
            })?);
        }

        if let Ok(v) = std::env::var("APEXDNS_HTTP_BIND_ADDR") {
            if v.to_lowercase() == "disabled" || v.is_empty() {
                config.http_bind_addr = None;
            } else {
                config.http_bind_addr = Some(v.parse().map_err(|_| {
                    CoreError::Config(format!("invalid APEXDNS_HTTP_BIND_ADDR: {v}"))
                })?);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.max_concurrent == 0 {
            return Err(CoreError::Config(
                "max_concurrent must be greater than 0".to_string(),
            ));
        }
        if self.l1.enabled && self.l1.max_entries == 0 {
            return Err(CoreError::Config(
                "l1.max_entries must be greater than 0 when L1 is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_concurrent() {
        let mut config = Config::default();
        config.max_concurrent = 0;
        assert!(config.validate().is_err());
    }
}
