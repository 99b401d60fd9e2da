//! Main HTTP Gateway Server.

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use textsnap_core::OcrBackend;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::{health_api, ocr_api, upload};

/// Application state shared across routes.
///
/// Holds no per-request data; every request is served independently.
#[derive(Clone)]
pub struct GatewayState {
    pub backend: Arc<dyn OcrBackend>,
    pub body_limit: usize,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(backend: Arc<dyn OcrBackend>, body_limit: usize) -> Self {
        Self {
            backend,
            body_limit,
            started_at: Instant::now(),
        }
    }
}

/// Build the gateway router: OCR endpoints, health, CORS for any origin.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/ocr", post(ocr_api::extract_text))
        .route("/ocr/upload", post(upload::upload_image))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway and serves until Ctrl+C.
#[instrument(skip(state), fields(backend = state.backend.name()))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind gateway to {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server terminated")?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
