/// API Routes definition

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::handlers;
use super::static_files;

pub fn create_router(enable_cors: bool) -> Router {
    // Protected routes (mutations, require authentication)
    let protected_routes = Router::new()
        .route("/api/config", put(handlers::put_config))
        .route("/api/update", post(handlers::refresh_data))
        .layer(middleware::from_fn(auth::auth_middleware));

    // Public routes (read-only, no auth required)
    let public_routes = Router::new()
        .route("/api/data", get(handlers::get_data))
        .route("/api/raw", get(handlers::get_raw))
        .route("/api/config", get(handlers::get_config))
        .route("/api/health", get(handlers::get_health))
        .route("/api/report", get(handlers::get_report));

    let mut app = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        // Serve the embedded dashboard - must be last to act as catch-all
        .fallback(static_files::static_handler)
        // Add tracing middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}
