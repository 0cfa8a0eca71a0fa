use std::path::Path;

use axum::{
    extract::{DefaultBodyLimit, Request},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub mod auth;
pub mod resources;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Build the full application router: API routes, then the SPA bundle for everything else.
pub fn build_router(
    state: ServerState,
    cors: CorsLayer,
    frontend_dir: &Path,
    body_limit: usize,
) -> Router {
    let spa = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(frontend_dir.join("index.html")));

    // Unmatched /api paths get a JSON 404 instead of index.html
    let fallback = move |req: Request| {
        let spa = spa.clone();
        async move {
            if is_api_path(req.uri().path()) {
                return JsonApiError::not_found().into_response();
            }
            match spa.oneshot(req).await {
                Ok(res) => res.into_response(),
                Err(never) => match never {},
            }
        }
    };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(auth::login))
        .merge(resources::resource_routes())
        .fallback(fallback)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
