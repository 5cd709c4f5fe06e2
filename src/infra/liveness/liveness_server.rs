//! HTTP liveness endpoint for the hosting platform.
//!
//! Runs on a separate tokio task and shares no state with the bot.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
}

/// Handler for GET / - the bot process is up.
async fn root() -> Json<StatusPayload> {
    Json(StatusPayload {
        status: "online",
        service: Some("emoji-guard-bot"),
    })
}

/// Handler for GET /health.
async fn health() -> Json<StatusPayload> {
    Json(StatusPayload {
        status: "healthy",
        service: None,
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Serve the liveness routes on an already bound listener.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

/// Run the liveness server on `0.0.0.0:port`.
///
/// This is a long-running task that should be spawned in the background.
/// Failures are logged; the bot keeps running without the endpoint.
pub async fn run_liveness_server(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind liveness server on {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("Liveness endpoint listening on {}", addr);

    if let Err(e) = serve(listener).await {
        tracing::error!("Liveness server error: {}", e);
    }
}
