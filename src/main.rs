mod actors;
mod api;
mod app_system;
mod clients;
mod config;
mod domain;
mod error;
mod messages;
mod validation;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use crate::api::AppState;
use crate::app_system::{setup_tracing, NoteSystem};
use crate::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = GatewayConfig::from_env();
    info!(environment = %config.environment, "Starting notes gateway");

    let system = NoteSystem::new(&config);
    let state = Arc::new(AppState::new(system.note_client.clone(), config.clone()));
    let app = api::routes::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "Notes gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Shutdown the actor system gracefully once the listener stops
    system.shutdown().await;

    info!("Notes gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
