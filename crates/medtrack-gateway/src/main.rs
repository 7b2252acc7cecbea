use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use medtrack_gateway::{app, service::ScheduleService};
use medtrack_store::ScheduleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medtrack_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via MEDTRACK_CONFIG > ~/.medtrack/medtrack.toml
    let config_path = std::env::var("MEDTRACK_CONFIG").ok();
    let config = medtrack_core::MedtrackConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        medtrack_core::MedtrackConfig::default()
    });

    let period = config
        .takings
        .period()
        .map_err(|e| anyhow::anyhow!("invalid takings.next_takings_period: {e}"))?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    medtrack_store::db::init_db(&db)?;
    info!("database migrations complete");

    let service = ScheduleService::new(ScheduleStore::new(db), period);
    let state = Arc::new(app::AppState::new(service));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    info!("medtrack gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server exited gracefully");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a working signal handler we simply never resolve;
            // the process then stops only when it is killed.
            tracing::error!("failed to install ctrl-c handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
