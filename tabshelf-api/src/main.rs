//! tabshelf-api - Guitar tablature catalog service
//!
//! Opens the catalog database once, optionally seeds example tabs, serves
//! the JSON API until SIGINT/SIGTERM, then closes the database.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tabshelf_api::settings::CliOverrides;
use tabshelf_api::{build_router, AppState, ServerSettings};
use tabshelf_common::config::TomlConfig;
use tabshelf_common::db::init_database;
use tabshelf_common::seed::seed_example_tabs;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for tabshelf-api
#[derive(Parser, Debug)]
#[command(name = "tabshelf-api")]
#[command(about = "Guitar tablature catalog with per-client ratings")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TABSHELF_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "TABSHELF_HOST")]
    host: Option<String>,

    /// Folder holding tabshelf.db (falls back to TABSHELF_ROOT_FOLDER, config file, OS default)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Do not insert example tabs into an empty catalog
    #[arg(long)]
    no_seed: bool,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            root_folder: args.root_folder,
            no_seed: args.no_seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tabshelf_api=debug,tabshelf_common=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting TabShelf API v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config = TomlConfig::load_or_default();
    let settings = ServerSettings::resolve(args.into(), &toml_config);

    let db_path = settings.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    if settings.seed_examples {
        let seeded = seed_example_tabs(&pool)
            .await
            .context("Failed to seed example tabs")?;
        if seeded == 0 {
            info!("Catalog already populated, skipping example tabs");
        }
    }

    let app = build_router(AppState::new(pool.clone()));

    let bind_address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!("tabshelf-api listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    pool.close().await;
    info!("Database closed, shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
