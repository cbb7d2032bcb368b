//! HTTP API.
//!
//! Document routes answer with `application/pdf` and stream the body:
//! rendering runs on its own task and hands bytes to the response through
//! a channel, so the client starts receiving the file before the page is
//! finished.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::GlobalConfig;
use crate::document::Compositor;
use crate::registry::WorkerRegistry;
use crate::{AppError, Result};

/// Shared state handed to every handler.
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<GlobalConfig>,
    /// Registration workflow.
    pub registry: WorkerRegistry,
    /// Document renderer.
    pub compositor: Compositor,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/workers", get(routes::list_workers))
        .route("/api/workers/register", post(routes::register))
        .route("/api/workers/{id}/pdf", get(routes::application_pdf))
        .route("/api/workers/{id}/receipt", get(routes::receipt_pdf))
        .route("/api/workers/{id}/upload-scan", post(routes::upload_scan))
        .with_state(state)
}

/// Bind `config.bind_address:http_port` and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the listener cannot bind or the server
/// fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = state.config.bind_addr();
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind HTTP on {bind}: {err}")))?;
    serve_on(listener, state, ct).await
}

/// Serve on an already-bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the server fails.
pub async fn serve_on(listener: TcpListener, state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "starting HTTP API");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Config(format!("HTTP server error: {err}")))?;

    info!("HTTP API shut down");
    Ok(())
}
