use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, AppState};

/// Largest request body accepted, in bytes. Matches MongoDB's maximum
/// document size; anything larger could never be stored.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Builds the HTTP router with its middleware stack.
///
/// Oversized bodies surface as a body read failure inside the handler,
/// which reports them as 400.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/vendor", post(handlers::create_vendor))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
