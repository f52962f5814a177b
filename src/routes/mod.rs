//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS,
//! and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (owns the timed quiz session)
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/subjects", get(http::http_get_subjects))
        .route("/api/v1/quiz", get(http::http_get_quiz))
        .route("/api/v1/quiz/submit", post(http::http_post_quiz_submit))
        .route(
            "/api/v1/assessment/questions",
            get(http::http_get_assessment_questions),
        )
        .route("/api/v1/assessment", post(http::http_post_assessment))
        .route("/api/v1/insights", get(http::http_get_insights))
        .route("/api/v1/doubt", post(http::http_post_doubt))
        .route("/api/v1/doubt/respond", post(http::http_post_respond_doubt))
        .route("/api/v1/doubts", get(http::http_get_doubts))
        .route("/api/v1/videos", get(http::http_get_videos))
        .route("/api/v1/summarize", post(http::http_post_summarize))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
