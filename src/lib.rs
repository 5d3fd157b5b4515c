pub mod api;
pub mod config;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize logging, start the embedded web server, and block until the
/// process receives Ctrl-C.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut server = api::server::start().await?;
    tracing::info!("Open http://{} in a browser to upload an image", server.addr);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl-C: {e}"))?;

    tracing::info!("Ctrl-C received, shutting down");
    server.shutdown();

    Ok(())
}
