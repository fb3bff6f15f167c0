use clap::Parser;
use tracing_subscriber::EnvFilter;

use mun_platform_api::config::AppConfig;
use mun_platform_api::{app, AppState};

#[derive(Parser)]
#[command(name = "mun-platform-api")]
#[command(about = "REST backend for the MUN Platform")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Bind host (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Bind port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Env file to load before reading configuration")]
    env_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present so cargo run picks up SUPABASE_URL, SECRET_KEY, etc.
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let bind_addr = config.bind_addr();
    tracing::info!("Starting MUN Platform API in {:?} mode", config.environment);

    let state = AppState::from_config(config)?;
    tracing::info!(
        storage = ?state.config.database.backend,
        token_lifetime_minutes = state.tokens.default_ttl().num_minutes(),
        secret_fingerprint = state.tokens.fingerprint(),
        "application state ready"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
