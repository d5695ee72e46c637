//! persona-api - Person enrichment service
//!
//! Accepts a name, asks the age, gender and nationality lookup sources about
//! it in parallel, and stores the person together with the inferred
//! characteristic. Stored records can be listed, read, updated and deleted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use persona_common::config::{AppConfig, ENV_DATABASE_URL, ENV_PORT};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persona_api::services::build_lookup_client;
use persona_api::AppState;

/// Command-line arguments for persona-api
#[derive(Parser, Debug)]
#[command(name = "persona-api")]
#[command(about = "Person enrichment service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ./persona.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = ENV_PORT)]
    port: Option<u16>,

    /// sqlx database URL
    #[arg(long, env = ENV_DATABASE_URL)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("persona_api={0},persona_sdk={0},tower_http={0}", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting persona-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let db_pool = persona_api::db::init_database_pool(&config.database_url).await?;
    info!("Database connection established");

    let lookup = build_lookup_client(&config.lookup).context("Failed to build lookup client")?;
    info!(
        "Lookup sources: {}, {}, {}",
        config.lookup.age_url, config.lookup.gender_url, config.lookup.nationality_url
    );

    let state = AppState::new(db_pool, Arc::new(lookup), config.query.clone());
    let app = persona_api::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
