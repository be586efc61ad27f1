//! 3D Gamers multiplayer server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use gamers3d::{AppState, app};
use server::{Config, run_sweep_loop};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("3D Gamers multiplayer server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Loaded configuration");
    info!("  Port: {}", config.server.port);
    info!("  Sweep interval: {}ms", config.server.sweep_interval_ms);

    let state = AppState::new(&config);

    // Start the liveness sweep loop
    let sweep_state = Arc::clone(&state.relay);
    let sweep_interval = config.server.sweep_interval_ms;
    tokio::spawn(async move {
        run_sweep_loop(sweep_state, sweep_interval).await;
    });

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("HTTP server: http://{}", addr);
    info!("WebSocket server: ws://{}", addr);

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Terminate open connections before exiting.
    state.relay.write().await.shutdown();
    info!("Server closed");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!("Shutting down server...");
}
