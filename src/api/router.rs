//! Application router.
//!
//! Returns a composable `Router` so tests can drive it in-process with
//! `tower::ServiceExt::oneshot` without binding a socket.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::page;
use crate::api::types::AppContext;
use crate::config;

/// Build the full application router.
pub fn app_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/api/process", post(endpoints::process::process))
        .route("/api/health", get(endpoints::health::check))
        .layer(DefaultBodyLimit::max(config::BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
