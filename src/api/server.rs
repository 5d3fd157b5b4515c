//! Web server lifecycle — bind, serve, graceful shutdown.
//!
//! Pattern: bind → build router → spawn background task → return handle
//! with a shutdown channel. `start_on` exists so tests can bind
//! `127.0.0.1:0` and read back the ephemeral port.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::app_router;
use crate::api::types::AppContext;
use crate::config;

/// Handle to a running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }
}

/// Start the server on the configured address.
pub async fn start() -> Result<ServerHandle, String> {
    start_on(config::bind_addr()).await
}

/// Start the server on a specific address.
pub async fn start_on(addr: SocketAddr) -> Result<ServerHandle, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = app_router(AppContext::new());
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server listening");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
