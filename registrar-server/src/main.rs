//! Serve ping/health/metrics while keeping this instance registered with Eureka.
use envconfig::Envconfig;
use eyre::Result;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use registrar::config::Config;
use registrar::server::serve;

async fn shutdown() {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");

    let mut interrupt = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("failed to register SIGINT handler");

    tokio::select! {
        _ = term.recv() => {},
        _ = interrupt.recv() => {},
    };

    tracing::info!("Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so it can set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if dotenv.is_err() {
        tracing::info!("no .env file found");
    }

    let config = Config::init_from_env()?;

    let listener = tokio::net::TcpListener::bind(config.bind()?).await?;

    serve(config, listener, shutdown()).await?;

    Ok(())
}
