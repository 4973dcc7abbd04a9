use std::net::SocketAddr;

use axum::Router;
use common::{env::ensure_data_dir, utils::logging::init_logging_from_env};
use configs::AppConfig;
use dotenvy::dotenv;
use service::Catalog;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Open storage and assemble the router for a validated configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    ensure_data_dir(&cfg.storage.data_dir, !cfg.storage.managed_host).await?;
    let catalog = Catalog::open(&cfg.storage).await.map_err(StartupError::from)?;
    info!(backend = catalog.backend().as_str(), data_dir = %cfg.storage.data_dir, "catalog storage ready");
    Ok(routes::build_router(ServerState::new(catalog), build_cors()))
}

/// Public entry: load configuration, build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate()?;
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting storefront server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
