//! Shutdown coordinator (spec.md §5's "stop accepting new work, drain
//! in-flight requests until a deadline, then close pools in reverse
//! dependency order"). Grounded on the teacher's
//! `graceful_shutdown::GracefulShutdown`: a broadcast channel signals
//! listeners to stop, then registered components are torn down with a
//! bounded timeout each.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::timeout;
use tracing::{error, info, warn};

type ShutdownResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type ShutdownFn = Box<dyn Fn() -> tokio::task::JoinHandle<ShutdownResult> + Send + Sync>;

struct ShutdownComponent {
    name: String,
    shutdown_fn: ShutdownFn,
}

/// Coordinates orderly teardown. Components are shut down in the reverse
/// of their registration order, so registering L3 before L2 before L1
/// closes L1 first, matching spec.md §5's "reverse dependency order".
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    components: Arc<Mutex<Vec<ShutdownComponent>>>,
    component_timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(component_timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_tx,
            components: Arc::new(Mutex::new(Vec::new())),
            component_timeout,
        }
    }

    /// A receiver that fires once when shutdown begins, for long-running
    /// tasks (e.g. the L1 sweep loop) to observe and exit cleanly.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub async fn register_component<F, Fut>(&self, name: impl Into<String>, shutdown_fn: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ShutdownResult> + Send + 'static,
    {
        let component = ShutdownComponent {
            name: name.into(),
            shutdown_fn: Box::new(move || {
                let fut = shutdown_fn();
                tokio::spawn(fut)
            }),
        };
        self.components.lock().await.push(component);
    }

    /// Signals all subscribers to stop accepting new work, waits `drain`
    /// for in-flight requests, then shuts down registered components in
    /// reverse registration order.
    pub async fn shutdown(&self, drain: Duration) -> ShutdownResult {
        info!("initiating graceful shutdown");

        if self.shutdown_tx.send(()).is_err() {
            warn!("no active shutdown subscribers");
        }

        info!(?drain, "draining in-flight requests");
        tokio::time::sleep(drain).await;

        let components = self.components.lock().await;
        for component in components.iter().rev() {
            info!(component = %component.name, "shutting down component");
            let handle = (component.shutdown_fn)();
            match timeout(self.component_timeout, handle).await {
                Ok(Ok(Ok(()))) => info!(component = %component.name, "shut down cleanly"),
                Ok(Ok(Err(e))) => error!(component = %component.name, error = %e, "shutdown failed"),
                Ok(Err(e)) => error!(component = %component.name, error = %e, "shutdown task panicked"),
                Err(_) => warn!(component = %component.name, "shutdown timed out"),
            }
        }

        info!("graceful shutdown complete");
        Ok(())
    }
}
