//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.
//!
//! When `server.static_dir` is configured and exists, it is served for every
//! path the API does not claim, with `index.html` as the fallback page.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.server.static_dir.clone();

    let mut router = Router::new()
        .route("/session", post(handlers::session::create_session))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/sessions/{session_id}/messages",
            get(handlers::session::get_messages),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(dir) = static_dir.filter(|d| Path::new(d).is_dir()) {
        let index_path = Path::new(&dir).join("index.html");
        let serve_dir = ServeDir::new(&dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %dir, "Static file serving enabled");
    }

    router
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
