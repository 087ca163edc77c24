use clap::Parser;
use tracing_subscriber::EnvFilter;

use cashcards::{app, is_production, AppState};

#[derive(Parser, Debug)]
#[command(name = "cashcards", version, about = "Cash Cards API server")]
struct Args {
    /// Interface to bind (overrides CASHCARDS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides CASHCARDS_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();

    let mut config = cashcards::config::config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting Cash Cards API in {:?} mode", config.environment);

    if is_production!() && config.database.url.is_none() {
        tracing::warn!("No DATABASE_URL set; cards live in memory and are lost on restart");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Cash Cards API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
