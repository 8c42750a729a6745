//! Roadshow Server
//!
//! Runs the stage engine and serves derived frames over HTTP + SSE

use anyhow::Result;
use roadshow_server::{api, driver, state};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Roadshow Server");

    // Create application state: engine bound to the slug registry, running
    let state = state::AppState::new();

    // Build the router
    let app = api::create_router(state.clone());

    // Start the frame driver in the background
    driver::start(state.clone()).await;

    // Start server
    let port = std::env::var("ROADSHOW_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9400);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
