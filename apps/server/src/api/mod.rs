//! API layer - routes and handlers

pub mod handlers;
pub mod params;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Root endpoint
        .route("/", get(root))
        // Universal search across document types (trailing slash optional)
        .route("/legal/search", get(handlers::legal::universal_search))
        .route("/legal/search/", get(handlers::legal::universal_search))
        // Citation lookup
        .route(
            "/legal/citation/:citation_type/:citation",
            get(handlers::legal::citation_search),
        )
        .route(
            "/legal/citation/:citation_type/:citation/",
            get(handlers::legal::citation_search),
        )
        // Document fetch by number
        .route(
            "/legal/docs/:doc_type/:no",
            get(handlers::legal::document_lookup),
        )
        .route(
            "/legal/docs/:doc_type/:no/",
            get(handlers::legal::document_lookup),
        )
        // Schedule D debts
        .route(
            "/schedules/schedule_d",
            get(handlers::debts::schedule_d_list),
        )
        .route(
            "/schedules/schedule_d/",
            get(handlers::debts::schedule_d_list),
        )
        .route(
            "/schedules/schedule_d/:sub_id",
            get(handlers::debts::schedule_d_by_sub_id),
        )
        .route(
            "/schedules/schedule_d/:sub_id/",
            get(handlers::debts::schedule_d_by_sub_id),
        )
        // Add state
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(cors(&cors_origins))
        .layer(TraceLayer::new_for_http())
        // Limit request body size to prevent DoS via large payloads
        .layer(DefaultBodyLimit::max(max_body_size))
}

fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // Secure default: no permissive CORS headers unless configured.
        return CorsLayer::new();
    }

    let mut header_values = Vec::with_capacity(origins.len());
    for origin in origins {
        if let Ok(value) = axum::http::HeaderValue::from_str(origin) {
            header_values.push(value);
        }
    }

    if header_values.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(header_values))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "docket-server"
    }))
}

async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "server": "Docket API",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "running"
        })),
    )
}
