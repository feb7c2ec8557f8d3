//! Process entry point: loads configuration, wires the store/cache/
//! resolver/orchestrator stack, starts the metrics/health HTTP surface,
//! and drives graceful shutdown. Grounded on the teacher's startup
//! sequence (`tracing_subscriber` init, `clap`-based CLI, `tokio::main`)
//! even though the teacher's own `main.rs` here is a stale raw-socket
//! prototype predating the rest of the crate; the wiring instead follows
//! the shape `http_server.rs`/`graceful_shutdown.rs` expect to be driven
//! by.

use apexdns::cache::{CacheStats, L2Cache, LocalCache, RedisCache, TieredCache};
use apexdns::config::Config;
use apexdns::graceful_shutdown::ShutdownCoordinator;
use apexdns::metrics::CoreMetrics;
use apexdns::model::LookupQuery;
use apexdns::orchestrator::Orchestrator;
use apexdns::resolver::Resolver;
use apexdns::selector::Selector;
use apexdns::store::memory::MemoryStore;
use apexdns::store::RecordStore;
use apexdns::wildcard::WildcardEngine;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "apexdns", about = "Authoritative DNS resolver over a tiered record cache")]
struct Cli {
    /// Overrides APEXDNS_DNS_PORT.
    #[arg(long)]
    dns_port: Option<u16>,

    /// Overrides APEXDNS_HTTP_BIND_ADDR.
    #[arg(long)]
    http_bind_addr: Option<SocketAddr>,

    /// Log filter passed to `tracing_subscriber::EnvFilter`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.clone())
        .init();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "fatal configuration error at startup");
            std::process::exit(1);
        }
    };

    if let Some(port) = cli.dns_port {
        config.dns_port = port;
    }
    if let Some(addr) = cli.http_bind_addr {
        config.http_bind_addr = Some(addr);
    }

    info!(dns_port = config.dns_port, "starting apexdns");

    if let Err(e) = run(config).await {
        error!(error = %e, "fatal runtime failure");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let cache_stats = Arc::new(CacheStats::default());

    // L3: durable store. `MemoryStore` is the reference implementation
    // (spec.md §4.1); a real deployment supplies a `RecordStore` over the
    // schema `store::sql` documents.
    let l3: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());

    let l1 = if config.l1.enabled {
        Some(Arc::new(LocalCache::new(config.l1.max_entries, cache_stats.clone())))
    } else {
        None
    };

    let l2: Option<Arc<dyn L2Cache>> = if config.l2.enabled {
        let redis = RedisCache::connect(&config.l2.address, "dns:").await?;
        Some(Arc::new(redis))
    } else {
        None
    };

    let cache: Arc<dyn RecordStore> = Arc::new(TieredCache::new(l1.clone(), l2, l3, cache_stats.clone()));

    let wildcard = Arc::new(WildcardEngine::new());
    let selector = Selector::new(config.selector_policy);
    let resolver = Arc::new(Resolver::new(cache.clone(), wildcard, selector));
    let metrics = Arc::new(CoreMetrics::new()?);
    let orchestrator = Arc::new(Orchestrator::new(resolver, metrics.clone(), config.udp_timeout));

    let shutdown = Arc::new(ShutdownCoordinator::new(config.shutdown_timeout));

    if let Some(l1) = l1 {
        let cleanup_interval = config.l1.cleanup_interval;
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cleanup_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => l1.sweep_expired(),
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    if let Some(bind_addr) = config.http_bind_addr {
        let store = cache.clone();
        let stats = cache_stats.clone();
        let metrics = metrics.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = apexdns::http::serve(bind_addr, store, stats, metrics, shutdown_rx).await {
                error!(error = %e, "metrics/health HTTP surface exited");
            }
        });
    }

    // The wire-level UDP/TCP listeners are out of scope (spec.md §1): a
    // real binary plugs a `codec::Codec` implementation in here to turn
    // bytes into `LookupQuery`s and feed `orchestrator.handle`. This
    // reference entry point drives one illustrative resolve so the process
    // has observable behavior without a codec.
    let _ = orchestrator
        .handle(LookupQuery::new("localhost", apexdns::RecordType::A))
        .await;

    tokio::signal::ctrl_c().await?;
    shutdown.shutdown(Duration::from_millis(500)).await?;
    Ok(())
}
