use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ubike_board::feed::{FeedClient, FeedConfig};
use ubike_board::session::{Poller, PollerConfig, Session};
use ubike_board::web::{AppState, create_router};

/// Address the board is served on.
const BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let feed_config = FeedConfig::default();
    info!(url = %feed_config.url, "using station feed");
    let feed = FeedClient::new(feed_config)?;

    let session = Arc::new(Session::new(feed));

    // Polling stops when this handle is dropped at the end of main.
    let poller = Poller::start(Arc::clone(&session), PollerConfig::default());

    let app = create_router(AppState::new(session));

    let addr = SocketAddr::from(BIND_ADDR);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("YouBike station board listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown();
    info!("shut down");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
