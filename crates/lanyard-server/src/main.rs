#![forbid(unsafe_code)]

use lanyard_server::{
    build_router, validate_startup_config, AppState, Config, HttpGateway, MockGateway,
    PaymentGateway,
};
use lanyard_store::Database;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::from_env();
    init_tracing(config.log_json);
    validate_startup_config(&config)?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("create database dir {parent:?}: {e}"))?;
    }
    let db = Arc::new(
        Database::open(&config.database_path).map_err(|e| format!("open database: {e}"))?,
    );

    let gateway: Arc<dyn PaymentGateway> = match &config.payment_api_key {
        Some(key) => Arc::new(HttpGateway::new(config.payment_base_url.clone(), key.clone())),
        None => {
            warn!("no payment gateway key configured; checkout uses the mock gateway");
            Arc::new(MockGateway::new())
        }
    };

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(db, config, gateway);
    let app = build_router(state);

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind failed: {e}"))?;
    info!("lanyard-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
