//! HTTP server
//!
//! Binds a listener and serves a router until Ctrl+C.

use axum::Router;
use tokio::net::TcpListener;

use crate::error::{RedirectError, Result};

/// Serve `router` on `addr` with graceful shutdown
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| RedirectError::Server(format!("failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
