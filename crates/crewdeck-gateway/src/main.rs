use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use crewdeck_core::config::CrewdeckConfig;
use crewdeck_gateway::{build_router, AppState};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "crewdeck-gateway")]
#[command(version, about = "Crew rotation scheduling API", long_about = None)]
struct Cli {
    /// Path to crewdeck.toml (falls back to CREWDECK_CONFIG, then ~/.crewdeck/crewdeck.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewdeck_gateway=info,tower_http=debug".into()),
        )
        .init();

    // explicit --config > CREWDECK_CONFIG env > ~/.crewdeck/crewdeck.toml
    let cli = Cli::parse();
    let config_path = cli.config.or_else(|| std::env::var("CREWDECK_CONFIG").ok());
    // no fallback to defaults: the default token secret is public
    let config = CrewdeckConfig::load(config_path.as_deref()).map_err(|e| {
        error!(code = e.code(), "config load failed: {}", e);
        e
    })?;

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(&db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    drop(db);

    // each subsystem gets its own connection; schemas are created on construction
    let crew = crewdeck_crew::CrewManager::new(rusqlite::Connection::open(&db_path)?)?;
    let schedule = crewdeck_schedule::ScheduleManager::new(rusqlite::Connection::open(&db_path)?)?;
    let access =
        crewdeck_access::AccessGate::new(rusqlite::Connection::open(&db_path)?, &config.access)?;
    info!("database ready");

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let state = Arc::new(AppState::new(config, crew, schedule, access));
    let router = build_router(state);

    info!("Crewdeck gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), "could not create database directory: {e}");
            }
        }
    }
}
