use anyhow::Result;
use caseiro_notify::{EmailChannel, SesTransport};
use caseiro_server::app;
use caseiro_server::config::ServerConfig;
use caseiro_server::state::AppState;
use caseiro_storage::s3::S3ObjectStore;
use caseiro_storage::{AlertStore, Gateway, TriggerDispatcher};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  caseiro-server [config.toml]    Start the dashboard (default config/server.toml)");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("caseiro=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        other => run_server(other.unwrap_or("config/server.toml")).await,
    }
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;
    tracing::info!(
        path = %config_path,
        alerts_bucket = %config.alerts.bucket,
        alerts = ?config.alerts.aws,
        triggers_bucket = %config.triggers.bucket,
        triggers = ?config.triggers.aws,
        "Loaded config"
    );
    if config.email.sender.trim().is_empty() {
        tracing::warn!("Email sender is not set, emailing alerts will fail");
    }

    // The two buckets may live in different accounts, one client each.
    let alerts_store = Arc::new(S3ObjectStore::connect(&config.alerts.aws).await);
    let triggers_store = Arc::new(S3ObjectStore::connect(&config.triggers.aws).await);

    let alerts = AlertStore::new(
        Gateway::new(alerts_store, config.alerts.bucket.clone()),
        config.alerts.prefix.clone(),
        config.presign_minutes,
    );
    let triggers = TriggerDispatcher::new(
        Gateway::new(triggers_store, config.triggers.bucket.clone()),
        config.triggers.prefix.clone(),
        config.triggers.source_tag.clone(),
    );
    let email = EmailChannel::new(Arc::new(SesTransport::connect(&config.email_aws()).await));

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let state = AppState::new(config, alerts, triggers, email)?;
    let app = app::build_http_app(state);

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(http = %http_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
