use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{
    file::{kyc_profiles::ProfileStore, transactions::TransactionStore},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.server.bind_addr())))
}

/// Open both collections and wire them into handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let profiles_path = cfg.storage.profiles_path();
    let transactions_path = cfg.storage.transactions_path();
    runtime::ensure_env(
        std::path::Path::new(&cfg.storage.data_dir),
        &[profiles_path.as_path(), transactions_path.as_path()],
    )
    .await
    .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let profiles = ProfileStore::new(profiles_path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let transactions = TransactionStore::new(transactions_path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(ServerState::new(profiles, transactions))
}

/// Build the app and serve it until the listener stops.
pub async fn run_with_config(cfg: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, data_dir = %cfg.storage.data_dir, "starting kyc/ledger server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}

/// Public entry: config from `config.toml` (or env), then serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    run_with_config(cfg).await?;
    Ok(())
}
