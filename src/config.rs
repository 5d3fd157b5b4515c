use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application-level constants
pub const APP_NAME: &str = "PixelPipe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 7860;

/// Largest upload accepted before decoding (OOM guard).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024; // 20 MB

/// Smallest plausible image file (the smallest valid PNG is ~67 bytes).
pub const MIN_UPLOAD_BYTES: usize = 67;

/// Multipart body limit — the upload cap plus form-encoding overhead.
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=info", env!("CARGO_PKG_NAME"))
}

/// Bind address for the embedded web server.
/// `PIXELPIPE_HOST` / `PIXELPIPE_PORT` override the `127.0.0.1:7860` default.
pub fn bind_addr() -> SocketAddr {
    bind_addr_from(
        std::env::var("PIXELPIPE_HOST").ok(),
        std::env::var("PIXELPIPE_PORT").ok(),
    )
}

fn bind_addr_from(host: Option<String>, port: Option<String>) -> SocketAddr {
    let host = host
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HOST);
    let port = port
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::new(host, port)
}
