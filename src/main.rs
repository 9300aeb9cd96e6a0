//! aoc-herald entry point.
//!
//! Starts the polling scheduler and the admin HTTP API, and stops both on
//! ctrl-c.

use std::sync::Arc;

use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use aoc_herald::api;
use aoc_herald::app_state::AppState;
use aoc_herald::clients::{AocClient, DiscordClient};
use aoc_herald::config::HeraldConfig;
use aoc_herald::persistence::{GuildStore, InMemoryGuildStore, PostgresGuildStore};
use aoc_herald::service::{GuildCycle, Scheduler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = HeraldConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(?config, "starting aoc-herald");

    // Build persistence layer
    let store: Arc<dyn GuildStore> = if config.persistence_enabled {
        let store = PostgresGuildStore::connect(&config).await?;
        store.migrate().await?;
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled; registrations and baselines are kept in memory");
        Arc::new(InMemoryGuildStore::new())
    };

    // Build collaborators and the polling loop
    let fetcher = Arc::new(AocClient::new(
        config.aoc_base_url.clone(),
        config.aoc_event_year,
        config.aoc_session.clone(),
        config.fetch_timeout(),
    )?);
    let dispatcher = Arc::new(DiscordClient::new(
        config.discord_api_base.clone(),
        config.discord_bot_token.clone(),
        config.fetch_timeout(),
    )?);
    let cycle = Arc::new(GuildCycle::new(fetcher, dispatcher, Arc::clone(&store)));
    let scheduler = Scheduler::new(cycle, config.poll_interval());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "admin api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let the in-flight tick finish before exiting
    let _ = shutdown_tx.send(true);
    scheduler_task.await?;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
