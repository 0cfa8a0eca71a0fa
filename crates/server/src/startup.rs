use std::{future::Future, net::SocketAddr};

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use configs::AppConfig;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tracing::info;

use service::storage::JsonFileStore;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// The only origin allowed to make credentialed cross-origin calls.
pub const ALLOWED_ORIGIN: &str =
    "https://lignesh-portfolio-jf9jbjobr-suhas-projects-c2a4b70d.vercel.app";

pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([HeaderValue::from_static(ALLOWED_ORIGIN)])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Wire the file store, services and router for the given configuration.
pub fn build_app(cfg: &AppConfig) -> Router {
    let store = JsonFileStore::new(cfg.storage.data_dir.clone());
    let state = ServerState::new(store);
    routes::build_router(
        state,
        build_cors(),
        &cfg.storage.frontend_dir,
        cfg.server.body_limit_bytes,
    )
}

/// Run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, shutdown_signal()).await
}

/// Run the HTTP server until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    common::env::ensure_env(&cfg.storage.frontend_dir, &cfg.storage.data_dir).await?;

    let app = build_app(&cfg);
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        data_dir = %cfg.storage.data_dir.display(),
        frontend_dir = %cfg.storage.frontend_dir.display(),
        "API server listening on http://localhost:{}",
        cfg.server.port
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
