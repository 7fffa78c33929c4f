//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>, max_concurrent_requests: usize) -> Router<()> {
    Router::new()
        .route("/favicon.ico", get(handlers::image::favicon))
        .route("/{*path}", get(handlers::image::get_image))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
}
