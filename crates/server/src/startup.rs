use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::env::{ensure_data_dir, storage_path};
use common::utils::logging::init_logging;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::clock::SystemClock;
use service::reminders::TracingScheduler;
use service::storage::{JsonFileKvStore, KvStore};
use service::{AppSettings, StudioApp};

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Router over an already-built app. Tests call this with an in-memory store.
pub fn build_app(app: StudioApp) -> Router {
    routes::build_router(ServerState::new(app), build_cors())
}

/// Public entry: load config, open the data file and serve HTTP.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;
    init_logging(&cfg.logging.format);

    ensure_data_dir(&cfg.storage.data_dir).await?;
    let path = storage_path(&cfg.storage.data_dir, &cfg.storage.file_name);
    let store: Arc<dyn KvStore> = JsonFileKvStore::open(&path).await?;

    let mut settings = AppSettings::from(&cfg);
    if settings.auth.jwt_secret.is_none() {
        warn!("JWT_SECRET not set; using the development secret");
        settings.auth.jwt_secret = Some(DEV_JWT_SECRET.to_string());
    }
    let app = StudioApp::new(store, Arc::new(TracingScheduler), Arc::new(SystemClock), settings);

    let router = build_app(app);
    let addr = bind_addr(&cfg)?;
    info!(%addr, data = %path.display(), "starting inkbook server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
