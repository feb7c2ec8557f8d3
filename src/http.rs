//! Metrics/health HTTP surface (spec.md §6's operational surface),
//! trimmed from the teacher's `http_server::HttpServer` — which also
//! serves cluster/rate-limiter/config-reload endpoints that are non-goals
//! here — down to `/healthz` and `/metrics`.

use crate::cache::CacheStats;
use crate::metrics::CoreMetrics;
use crate::store::RecordStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    store: Arc<dyn RecordStore>,
    cache_stats: Arc<CacheStats>,
    metrics: Arc<CoreMetrics>,
}

pub async fn serve(
    bind_addr: SocketAddr,
    store: Arc<dyn RecordStore>,
    cache_stats: Arc<CacheStats>,
    metrics: Arc<CoreMetrics>,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let state = AppState {
        store,
        cache_stats,
        metrics,
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(CorsLayer::permissive());

    info!(%bind_addr, "starting metrics/health HTTP surface");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "healthy"}))).into_response(),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy", "reason": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    state.metrics.sync_cache_stats(state.cache_stats.snapshot());
    match state.metrics.export() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body.into())
            .unwrap(),
        Err(e) => {
            error!(error = %e, "failed to export metrics");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body("metrics export failed".into())
                .unwrap()
        }
    }
}
